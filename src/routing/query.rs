//! Query string parsing.

use std::collections::BTreeMap;

/// Parse a raw query string into a flat map of decoded key/value pairs.
///
/// A leading `?` is tolerated. Duplicate keys keep the last value. Input that
/// cannot be decoded never fails; it simply contributes nothing (or a lossy value).
pub fn parse_query(raw: &str) -> BTreeMap<String, String> {
    let trimmed = raw.trim().trim_start_matches('?');
    if trimmed.is_empty() {
        return BTreeMap::new();
    }

    url::form_urlencoded::parse(trimmed.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Serialize a query map back into `a=1&b=2` form.
pub fn to_query_string(query: &BTreeMap<String, String>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish()
}
