/// Prefix a site-relative path with the deployment base (e.g. `/myListening/`).
///
/// Absolute `http(s)://` URLs and paths already under `base` are returned as is.
pub fn with_base(base: &str, path: &str) -> String {
    let base = if base.is_empty() { "/" } else { base };
    if path.is_empty() {
        return base.to_string();
    }
    if is_absolute_url(path) || path.starts_with(base) {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
