/// Converts a source-relative or protocol-relative link into an absolute
/// URL anchored at `origin`. Already-absolute URLs pass through unchanged.
pub fn absolutize(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    if href.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), href);
    }
    if href.contains("://") {
        return href.to_string();
    }
    format!("{}/{}", origin.trim_end_matches('/'), href)
}
