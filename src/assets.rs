use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is when encoding a relative asset path.
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'%')
    .remove(b'+')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Turns a stored `imagen_url` into an absolute URL.
///
/// Empty values and values that already carry an http(s) scheme pass through;
/// anything else is treated as a path relative to `static_base_url`.
pub fn resolve_image_url(value: Option<&str>, static_base_url: &str) -> Option<String> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        other => return other.map(str::to_string),
    };

    let normalized = value.trim();
    let lower = normalized.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(normalized.to_string());
    }

    let base = static_base_url.trim_end_matches('/');
    let path = normalized.replace('\\', "/");
    let path = path.trim_start_matches('/');
    let encoded = utf8_percent_encode(path, PATH_SAFE);

    Some(format!("{}/{}", base, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8010/static";

    #[test]
    fn relative_path_gets_base_url() {
        assert_eq!(
            resolve_image_url(Some("products/x.jpg"), BASE).as_deref(),
            Some("http://localhost:8010/static/products/x.jpg")
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = "https://cdn.sport4data.com/img/zapatillas-pro.png";
        assert_eq!(resolve_image_url(Some(url), BASE).as_deref(), Some(url));
        assert_eq!(
            resolve_image_url(Some("HTTP://cdn.example.com/a.png"), BASE).as_deref(),
            Some("HTTP://cdn.example.com/a.png")
        );
    }

    #[test]
    fn empty_and_missing_pass_through() {
        assert_eq!(resolve_image_url(None, BASE), None);
        assert_eq!(resolve_image_url(Some(""), BASE).as_deref(), Some(""));
    }

    #[test]
    fn spaces_are_encoded_and_separators_kept() {
        assert_eq!(
            resolve_image_url(Some("products/Zapatillas Trail Falcon.jpg"), BASE).as_deref(),
            Some("http://localhost:8010/static/products/Zapatillas%20Trail%20Falcon.jpg")
        );
    }

    #[test]
    fn backslashes_and_leading_slashes_are_normalized() {
        assert_eq!(
            resolve_image_url(Some("\\products\\a b.png"), "http://cdn/static/").as_deref(),
            Some("http://cdn/static/products/a%20b.png")
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            resolve_image_url(Some("  https://x.io/a.jpg "), BASE).as_deref(),
            Some("https://x.io/a.jpg")
        );
    }

    #[test]
    fn already_encoded_sequences_are_kept() {
        assert_eq!(
            resolve_image_url(Some("products/a%20b.jpg"), BASE).as_deref(),
            Some("http://localhost:8010/static/products/a%20b.jpg")
        );
    }
}
