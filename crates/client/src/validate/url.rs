//! Website string to request URL.

/// Turn a stored website string into a URL for the replay request.
///
/// Strings already carrying an `http://` or `https://` scheme pass through
/// untouched; anything else gets `https://` in front. Nothing else is
/// checked here, so a malformed host shows up later as a transport failure.
pub fn normalize_website(website: &str) -> String {
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}
