//! Content-type allow-list.

/// Content types accepted when no allow-list is configured.
pub const DEFAULT_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/bmp",
];

/// Gate deciding which uploads may enter a bucket.
///
/// Matching ignores ASCII case and any parameters after `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeValidator {
    allowed: Vec<String>,
}

impl Default for ContentTypeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPES.iter().copied())
    }
}

impl ContentTypeValidator {
    /// Build a validator from an allow-list.
    pub fn new<I, T>(allowed: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .collect(),
        }
    }

    /// Whether `content_type` may be stored.
    pub fn accept(&self, content_type: &str) -> bool {
        let content_type = normalize(content_type);
        self.allowed.iter().any(|allowed| *allowed == content_type)
    }

    /// The normalized allow-list.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Content type to serve for a stored name, inferred from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_accepts_images() {
        let validator = ContentTypeValidator::default();
        for ok in ["image/png", "image/jpeg", "image/webp", "image/bmp", "IMAGE/PNG"] {
            assert!(validator.accept(ok), "{ok}");
        }
        assert!(validator.accept("image/jpeg; charset=binary"));
    }

    #[test]
    fn default_list_rejects_everything_else() {
        let validator = ContentTypeValidator::default();
        for bad in ["image/gif", "text/html", "application/octet-stream", "", "image/svg+xml"] {
            assert!(!validator.accept(bad), "{bad}");
        }
    }

    #[test]
    fn custom_list() {
        let validator = ContentTypeValidator::new(["image/gif"]);
        assert!(validator.accept("image/gif"));
        assert!(!validator.accept("image/png"));
    }

    #[test]
    fn serve_type_from_extension() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("default.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
