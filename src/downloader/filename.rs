use percent_encoding::percent_decode_str;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameSource {
    Url,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilename {
    pub name: String,
    pub source: FilenameSource,
}

// Generated names only have one-second resolution, so they can collide.
pub fn resolve_filename(url: &str) -> ResolvedFilename {
    match filename_from_url_path(url) {
        Some(name) => ResolvedFilename {
            name,
            source: FilenameSource::Url,
        },
        None => ResolvedFilename {
            name: generated_filename(),
            source: FilenameSource::Generated,
        },
    }
}

fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = percent_decode_str(parsed.path()).decode_utf8_lossy();

    let candidate = path.rsplit('/').next()?;

    if candidate.is_empty()
        || !candidate.contains('.')
        || candidate == "."
        || candidate == ".."
        || candidate.contains('\0')
    {
        return None;
    }

    Some(candidate.to_string())
}

fn generated_filename() -> String {
    format!("image_{}.jpg", chrono::Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::{resolve_filename, FilenameSource};

    fn assert_generated(url: &str) {
        let resolved = resolve_filename(url);

        assert_eq!(resolved.source, FilenameSource::Generated, "{url}");

        let timestamp = resolved
            .name
            .strip_prefix("image_")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .expect("generated name has image_<n>.jpg shape");

        assert!(timestamp.parse::<i64>().is_ok(), "{}", resolved.name);
    }

    #[test]
    fn test_filename_from_path() {
        let resolved = resolve_filename("https://example.com/photo.png");

        assert_eq!(resolved.name, "photo.png");
        assert_eq!(resolved.source, FilenameSource::Url);

        let resolved = resolve_filename("https://cdn.example.com/a/b/rust-logo-512x512.png");

        assert_eq!(resolved.name, "rust-logo-512x512.png");
    }

    #[test]
    fn test_filename_is_percent_decoded() {
        let resolved = resolve_filename("https://example.com/gallery/my%20cat%20%28old%29.jpeg");

        assert_eq!(resolved.name, "my cat (old).jpeg");
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let resolved = resolve_filename("https://example.com/pic.webp?size=large#top");

        assert_eq!(resolved.name, "pic.webp");
    }

    #[test]
    fn test_generated_when_path_has_no_file() {
        assert_generated("https://example.com/");
        assert_generated("https://example.com");
        assert_generated("https://example.com/images/");
    }

    #[test]
    fn test_generated_when_segment_has_no_extension() {
        assert_generated("https://www.rust-lang.org/logos/rust-logo-512x512");
    }

    #[test]
    fn test_dot_segments_fall_back() {
        assert_generated("https://example.com/a%2F..");
        assert_generated("https://example.com/a%2F.");
        assert_generated("https://example.com/%2e%2e");
    }

    #[test]
    fn test_nul_byte_falls_back() {
        assert_generated("https://example.com/%00.png");
        assert_generated("https://example.com/img/photo%00.jpg");
    }

    #[test]
    fn test_generated_when_url_does_not_parse() {
        assert_generated("rust-logo-512x512.png");
        assert_generated("http://");
    }
}
