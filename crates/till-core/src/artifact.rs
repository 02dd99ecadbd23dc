//! # Artifact Naming
//!
//! Names of stored artifacts and the code reference URL that points at a
//! stored receipt.
//!
//! ## Naming Scheme
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  uuid v4 ──► receipt_3f2a…c1.pdf         (ArtifactKind::Receipt)        │
//! │                    │                                                    │
//! │                    └─► qr_receipt_3f2a…c1.png (ArtifactKind::CodeImage) │
//! │                                                                         │
//! │  code reference = {site_base}{media_path}{receipt name}                 │
//! │                   http://localhost:8000/media/receipt_3f2a…c1.pdf       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every name is a bare file name. [`ArtifactName::parse`] is the only way
//! to build one from untrusted input, so a name can always be joined to a
//! storage root without escaping it.

use std::fmt;

use uuid::Uuid;

use crate::error::ValidationError;

/// Longest accepted artifact name, in bytes.
pub const MAX_ARTIFACT_NAME_LEN: usize = 255;

const FILENAME_FIELD: &str = "filename";

// =============================================================================
// Artifact Kind
// =============================================================================

/// The two kinds of blob the receipt pipeline stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The rendered receipt document.
    Receipt,
    /// The scannable code image pointing at a receipt.
    CodeImage,
}

impl ArtifactKind {
    /// MIME type of this kind of artifact.
    pub const fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Receipt => "application/pdf",
            ArtifactKind::CodeImage => "image/png",
        }
    }

    /// File extension, without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Receipt => "pdf",
            ArtifactKind::CodeImage => "png",
        }
    }
}

// =============================================================================
// Artifact Name
// =============================================================================

/// A validated bare file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Validates `name` as a bare file name.
    ///
    /// ## Rules
    /// - Not empty, at most [`MAX_ARTIFACT_NAME_LEN`] bytes
    /// - No `/`, `\` or NUL
    /// - Does not start with `.` (rules out `.`, `..` and hidden files)
    ///
    /// ## Example
    /// ```rust
    /// use till_core::ArtifactName;
    ///
    /// assert!(ArtifactName::parse("receipt_1.pdf").is_ok());
    /// assert!(ArtifactName::parse("../etc/passwd").is_err());
    /// assert!(ArtifactName::parse(".env").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: FILENAME_FIELD.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(ValidationError::Required {
                field: FILENAME_FIELD.to_string(),
            });
        }
        if name.len() > MAX_ARTIFACT_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: FILENAME_FIELD.to_string(),
                max: MAX_ARTIFACT_NAME_LEN,
            });
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(invalid("must not contain path separators"));
        }
        if name.starts_with('.') {
            return Err(invalid("must not start with '.'"));
        }

        Ok(ArtifactName(name.to_string()))
    }

    /// Name for a new receipt document: `receipt_{uuid}.pdf`.
    pub fn receipt(id: Uuid) -> Self {
        ArtifactName(format!(
            "receipt_{}.{}",
            id.simple(),
            ArtifactKind::Receipt.extension()
        ))
    }

    /// Name of the code image for `receipt`: same stem, `qr_` prefix, `.png`.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::ArtifactName;
    ///
    /// let receipt = ArtifactName::parse("receipt_ab12.pdf").unwrap();
    /// let image = ArtifactName::code_image_for(&receipt);
    /// assert_eq!(image.as_str(), "qr_receipt_ab12.png");
    /// ```
    pub fn code_image_for(receipt: &ArtifactName) -> Self {
        ArtifactName(format!(
            "qr_{}.{}",
            receipt.stem(),
            ArtifactKind::CodeImage.extension()
        ))
    }

    /// The name without its final extension.
    pub fn stem(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Code Reference
// =============================================================================

/// Builds the URL a scanned code resolves to.
///
/// Plain concatenation of `site_base`, `media_path` and the receipt name;
/// callers normalise the first two once at configuration time.
///
/// ## Example
/// ```rust
/// use till_core::artifact::{receipt_url, ArtifactName};
///
/// let name = ArtifactName::parse("receipt_ab12.pdf").unwrap();
/// assert_eq!(
///     receipt_url("http://localhost:8000", "/media/", &name),
///     "http://localhost:8000/media/receipt_ab12.pdf"
/// );
/// ```
pub fn receipt_url(site_base: &str, media_path: &str, receipt: &ArtifactName) -> String {
    format!("{}{}{}", site_base, media_path, receipt)
}

// =============================================================================
// Unit Tests
// =============================================================================
