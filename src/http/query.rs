//! Query string parsing
//!
//! Decodes `application/x-www-form-urlencoded` parameters the way a browser
//! `URLSearchParams` does: `+` is a space and `%XX` escapes are UTF-8 bytes.

/// Decode one query component. Returns `None` if the bytes are not UTF-8.
fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(std::borrow::Cow::into_owned)
}

/// First value of parameter `name` in `query` (without the leading `?`).
///
/// A parameter present without `=` yields an empty string.
pub fn get_query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if decode_component(key)? == name {
                Some(decode_component(value))
            } else {
                None
            }
        })
        .flatten()
}
