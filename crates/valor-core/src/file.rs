//! # File Value Objects
//!
//! [`FileExtension`] and [`MimeType`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// File Extension
// =============================================================================

static EXTENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:\.[a-z0-9]+)*$").expect("extension pattern is valid")
});

const MAX_EXTENSION_LENGTH: usize = 16;

/// A file extension, lowercase and without the leading dot (`pdf`, `tar.gz`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileExtension(String);

impl FileExtension {
    /// ## Example
    /// ```rust
    /// use valor_core::FileExtension;
    ///
    /// assert_eq!(FileExtension::new(".PDF").unwrap().as_str(), "pdf");
    /// assert!(FileExtension::new("p df").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        let normalized = input.trim().trim_start_matches('.').to_lowercase();
        if normalized.len() > MAX_EXTENSION_LENGTH || !EXTENSION_PATTERN.is_match(&normalized) {
            return Err(Error::invalid("invalid file extension").with_context("input", input));
        }
        Ok(FileExtension(normalized))
    }

    /// Extension of a file name: everything after the last dot.
    pub fn from_file_name(name: &str) -> Result<Self> {
        match name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => FileExtension::new(extension),
            _ => Err(Error::invalid("file name has no extension").with_context("input", name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MIME type for common extensions.
    pub fn mime_type(&self) -> Option<MimeType> {
        let essence = match self.0.as_str() {
            "pdf" => "application/pdf",
            "json" => "application/json",
            "xml" => "application/xml",
            "zip" => "application/zip",
            "csv" => "text/csv",
            "txt" => "text/plain",
            "html" | "htm" => "text/html",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            _ => return None,
        };
        MimeType::new(essence).ok()
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(FileExtension);

// =============================================================================
// MIME Type
// =============================================================================

/// RFC 6838 `type/subtype` with restricted-name characters.
static MIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9!#$&^_.+-]{0,126}/[a-z0-9][a-z0-9!#$&^_.+-]{0,126}$")
        .expect("mime pattern is valid")
});

/// A media type essence (`type/subtype`), lowercase. Parameters such as
/// `; charset=utf-8` are dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MimeType(String);

impl MimeType {
    /// ## Example
    /// ```rust
    /// use valor_core::MimeType;
    ///
    /// let mime = MimeType::new("Text/HTML; charset=UTF-8").unwrap();
    /// assert_eq!(mime.as_str(), "text/html");
    /// assert_eq!(mime.subtype(), "html");
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        let essence = input.split(';').next().unwrap_or("").trim().to_lowercase();
        if !MIME_PATTERN.is_match(&essence) {
            return Err(Error::invalid("MIME type must look like type/subtype").with_context("input", input));
        }
        Ok(MimeType(essence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level type: `image` in `image/png`.
    pub fn top_level(&self) -> &str {
        self.0.split_once('/').map_or("", |(top, _)| top)
    }

    pub fn subtype(&self) -> &str {
        self.0.split_once('/').map_or("", |(_, sub)| sub)
    }

    pub fn is_image(&self) -> bool {
        self.top_level() == "image"
    }

    pub fn is_text(&self) -> bool {
        self.top_level() == "text"
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(MimeType);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{Scanner, SqlValue, Valuer};

    #[test]
    fn test_extension_normalization() {
        assert_eq!(FileExtension::new("JPG").unwrap().as_str(), "jpg");
        assert_eq!(FileExtension::new("tar.gz").unwrap().as_str(), "tar.gz");
        for bad in ["", ".", "p df", "a..b", "xml!", "verylongextension"] {
            assert!(FileExtension::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_extension_from_file_name() {
        assert_eq!(FileExtension::from_file_name("nota-fiscal.XML").unwrap().as_str(), "xml");
        assert!(FileExtension::from_file_name("README").is_err());
        assert!(FileExtension::from_file_name(".bashrc").is_err());
    }

    #[test]
    fn test_extension_mime_type() {
        let png = FileExtension::new("png").unwrap();
        assert_eq!(png.mime_type().unwrap().as_str(), "image/png");
        assert!(FileExtension::new("xyz").unwrap().mime_type().is_none());
    }

    #[test]
    fn test_mime_type() {
        let mime = MimeType::new("application/vnd.ms-excel").unwrap();
        assert_eq!(mime.top_level(), "application");
        assert_eq!(mime.subtype(), "vnd.ms-excel");
        assert!(MimeType::new("image/svg+xml").unwrap().is_image());
        for bad in ["", "text", "text/", "/html", "text/html/extra", "te xt/html"] {
            assert!(MimeType::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_sql_and_json() {
        let mime = MimeType::new("text/csv").unwrap();
        assert_eq!(MimeType::scan(mime.to_sql()).unwrap(), mime);
        assert_eq!(serde_json::to_string(&mime).unwrap(), "\"text/csv\"");
        assert!(serde_json::from_str::<MimeType>("\"csv\"").is_err());

        let ext = FileExtension::new("pdf").unwrap();
        assert_eq!(FileExtension::scan(SqlValue::Text(".PDF".into())).unwrap(), ext);
        assert_eq!(FileExtension::scan(SqlValue::Null).unwrap(), FileExtension::default());
    }
}
