/// Adds `https://` to addresses typed without a scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

pub fn host_of(raw: &str) -> Option<String> {
    ::url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
