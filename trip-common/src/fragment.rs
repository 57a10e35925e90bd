//! Extraction of free-text sub-objects embedded in content payloads.
//!
//! Some producers inline status blocks like `"state":{1:2,3:4,...}` directly
//! into an otherwise-JSON content string. Unquoted integer keys make the
//! block invalid JSON, so it has to be cut out textually before the rest of
//! the document can go through serde.

/// Locate the `"<name>":{` marker in `text` and split out its fragment.
///
/// Returns `(remainder, body)` where `body` is the text between the marker
/// and the first closing brace found scanning from the marker, and
/// `remainder` is `text` with the span from the marker through that brace
/// plus one following character (the usual trailing comma) removed.
///
/// A missing marker is not an error: the text comes back unchanged with an
/// empty body. The brace scan is shallow on purpose; a nested brace inside
/// the fragment truncates extraction at that brace.
pub fn extract_named(text: &str, name: &str) -> (String, String) {
    let marker = format!("\"{}\":{{", name);

    let Some(start) = text.find(&marker) else {
        return (text.to_owned(), String::new());
    };
    let Some(brace) = text[start..].find('}') else {
        return (text.to_owned(), String::new());
    };

    let brace = start + brace;
    // Skip the brace and one following character (the usual trailing
    // comma). Counted in characters: the next byte may not be a char
    // boundary.
    let end = text[brace..]
        .char_indices()
        .nth(2)
        .map_or(text.len(), |(i, _)| brace + i);

    let body = text[start + marker.len()..brace].to_owned();
    let remainder = format!("{}{}", &text[..start], &text[end..]);

    (remainder, body)
}

/// Drop the last two comma-separated elements of a fragment body.
///
/// Producers append two non-numeric trailer fields to inlined status blocks;
/// they have to go before the body reaches the state-map codec. Bodies with
/// fewer than two elements pass through unchanged.
pub fn drop_trailer(body: &str) -> String {
    let parts: Vec<&str> = body.split(',').collect();
    if parts.len() >= 2 {
        parts[..parts.len() - 2].join(",")
    } else {
        body.to_owned()
    }
}
