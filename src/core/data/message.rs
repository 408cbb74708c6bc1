use std::collections::HashMap;

/// Flattened locale data: dotted key (`"home.title"`) to display string.
///
/// This is the lookup representation for both whole-locale dictionaries and
/// the subset contributed by a single locale file.
pub type FlatMessages = HashMap<String, String>;

/// Join a namespace prefix and a call-site key into a dictionary key.
///
/// An empty prefix leaves the suffix untouched; otherwise the two are joined
/// with a single `.`.
pub fn compose_key(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{}.{}", prefix, suffix)
    }
}
