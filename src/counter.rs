//! Like counter adapter
//!
//! Maps slugs onto store keys and reads/writes counts as decimal strings.
//! Increments are a plain read-modify-write: two concurrent increments of the
//! same slug may both read the same value and one of them is lost.

use crate::logger;
use crate::store::{KvStore, StoreError};

/// Prefix prepended to every slug to form its store key
pub const KEY_PREFIX: &str = "likes:";

/// Like count for a single slug
pub type LikeCount = u64;

/// Store key for `slug`. The slug is used verbatim.
pub fn like_key(slug: &str) -> String {
    format!("{KEY_PREFIX}{slug}")
}

/// Interpret a stored value the way `parseInt(raw, 10)` reads it.
///
/// Leading whitespace and an optional `+` are skipped, then the leading run
/// of ASCII digits is the count (`"12abc"` is 12, `"1.5"` is 1). No digits, a
/// leading `-`, or a run that overflows `u64` count as 0.
fn parse_count(raw: &str) -> LikeCount {
    let unsigned = raw.trim_start();
    let unsigned = unsigned.strip_prefix('+').unwrap_or(unsigned);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end].parse().unwrap_or(0)
}

/// Current like count for `slug`; absent or malformed values read as 0.
pub async fn get_likes(store: &dyn KvStore, slug: &str) -> Result<LikeCount, StoreError> {
    let key = like_key(slug);
    let raw = store.get(&key).await?;
    logger::log_debug(&format!("[Store] get {key} -> {raw:?}"));

    Ok(raw.as_deref().map_or(0, parse_count))
}

/// Overwrite the like count for `slug`
pub async fn set_likes(
    store: &dyn KvStore,
    slug: &str,
    value: LikeCount,
) -> Result<(), StoreError> {
    let key = like_key(slug);
    logger::log_debug(&format!("[Store] put {key} = {value}"));
    store.put(&key, &value.to_string()).await
}

/// Add one like to `slug` and return the new count.
///
/// Not atomic. The write is skipped if the read fails.
pub async fn increment_likes(store: &dyn KvStore, slug: &str) -> Result<LikeCount, StoreError> {
    let current = get_likes(store, slug).await?;
    let next = current.saturating_add(1);
    set_likes(store, slug, next).await?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{FailOn, FailingStore, GatedStore, RecordingStore};
    use crate::store::MemoryStore;
    use std::time::Duration;

    #[test]
    fn test_like_key() {
        assert_eq!(like_key("hello-world"), "likes:hello-world");
        assert_eq!(like_key("a:b"), "likes:a:b");
        assert_eq!(like_key("日本語 スラッグ"), "likes:日本語 スラッグ");
    }

    #[test]
    fn test_like_key_distinct_slugs_never_collide() {
        let slugs = ["a", "a:", ":a", "likes:a", "A", "a ", "a/b", "a%20b"];
        for (i, s1) in slugs.iter().enumerate() {
            for (j, s2) in slugs.iter().enumerate() {
                assert_eq!(like_key(s1) == like_key(s2), i == j, "{s1:?} vs {s2:?}");
            }
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("7"), 7);
        assert_eq!(parse_count(" 42\n"), 42);
        assert_eq!(parse_count("+5"), 5);
        assert_eq!(parse_count("007"), 7);
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count("1.5"), 1);
        assert_eq!(parse_count("3e2"), 3);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("+"), 0);
        assert_eq!(parse_count(" - 3"), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("99999999999999999999999"), 0);
    }

    #[tokio::test]
    async fn test_get_likes_absent_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(get_likes(&store, "fresh").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_likes_reads_stored_value() {
        let store = MemoryStore::with_entries([("likes:post", "7")]);
        assert_eq!(get_likes(&store, "post").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_get_likes_malformed_is_zero() {
        let store = MemoryStore::with_entries([("likes:post", "abc")]);
        assert_eq!(get_likes(&store, "post").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_likes_reads_leading_digits() {
        let store = MemoryStore::with_entries([("likes:a", "12abc"), ("likes:b", "1.5")]);
        assert_eq!(get_likes(&store, "a").await.unwrap(), 12);
        assert_eq!(increment_likes(&store, "b").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_likes_stores_decimal_string() {
        let store = MemoryStore::new();
        set_likes(&store, "post", 1234).await.unwrap();
        assert_eq!(
            store.get("likes:post").await.unwrap().as_deref(),
            Some("1234")
        );
    }

    #[tokio::test]
    async fn test_increment_sequential() {
        let store = RecordingStore::new();
        assert_eq!(increment_likes(&store, "post").await.unwrap(), 1);
        assert_eq!(increment_likes(&store, "post").await.unwrap(), 2);
        assert_eq!(store.gets(), 2);
        assert_eq!(store.puts(), 2);
        assert_eq!(get_likes(&store, "post").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_repairs_malformed_value() {
        let store = MemoryStore::with_entries([("likes:post", "garbage")]);
        assert_eq!(increment_likes(&store, "post").await.unwrap(), 1);
        assert_eq!(store.get("likes:post").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_increment_saturates() {
        let store = MemoryStore::with_entries([("likes:post", u64::MAX.to_string())]);
        assert_eq!(increment_likes(&store, "post").await.unwrap(), u64::MAX);
    }

    #[tokio::test]
    async fn test_increment_skips_write_when_read_fails() {
        let store = FailingStore::new(FailOn::Get);
        let result = increment_likes(&store, "post").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.puts(), 0);
    }

    #[tokio::test]
    async fn test_increment_propagates_write_failure() {
        let store = FailingStore::new(FailOn::Put);
        assert!(increment_likes(&store, "post").await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_increments_can_lose_update() {
        let store = GatedStore::new(2);
        let (a, b) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(
                increment_likes(&store, "post"),
                increment_likes(&store, "post")
            )
        })
        .await
        .expect("interleaved increments did not finish");
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);
        assert_eq!(
            store.get("likes:post").await.unwrap().as_deref(),
            Some("1")
        );
    }
}
