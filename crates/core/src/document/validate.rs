//! Upload file-type validation.
//!
//! Uploads are gated by a fixed allow-list of file extensions. The set is
//! process-wide and immutable; membership is checked case-insensitively on
//! the suffix after the last `.` of the file name.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::error::DocumentError;

/// Accepted file extensions, lower-cased, with leading dot.
const ALLOWED_EXTENSIONS: [&str; 12] = [
    ".pdf", ".xls", ".xlsx", ".doc", ".docx", ".txt", ".jpg", ".jpeg", ".png", ".gif", ".bmp",
    ".tiff",
];

static ALLOWED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_EXTENSIONS.iter().copied().collect());

/// Comma-separated allow-list, used in rejection messages.
#[must_use]
pub fn allowed_extensions() -> String {
    ALLOWED_EXTENSIONS.join(", ")
}

/// Validates a file name against the extension allow-list.
///
/// Returns the canonical (lower-cased) extension on success.
///
/// # Errors
///
/// Returns `DocumentError::InvalidFileType` when the name has no extension or
/// the extension is not in the allow-list.
pub fn validate_file_name(name: &str) -> Result<&'static str, DocumentError> {
    let extension = name
        .rfind('.')
        .map_or_else(String::new, |i| name[i..].to_lowercase());

    ALLOWED_SET
        .get(extension.as_str())
        .copied()
        .ok_or_else(|| DocumentError::InvalidFileType {
            extension,
            allowed: allowed_extensions(),
        })
}

/// MIME type for an allowed extension.
#[must_use]
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension {
        ".pdf" => "application/pdf",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".txt" => "text/plain",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".bmp" => "image/bmp",
        ".tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Best-effort MIME type from the extension of any file name or object key.
#[must_use]
pub fn mime_type_for_name(name: &str) -> &'static str {
    name.rfind('.')
        .map_or("application/octet-stream", |i| {
            mime_type_for(&name[i..].to_lowercase())
        })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // For any file name, validation accepts exactly the names whose
    // lower-cased suffix after the last dot is in the allow-list.
    proptest! {
        #[test]
        fn prop_validation_matches_allow_list(name in ".{0,40}") {
            let extension = name
                .rfind('.')
                .map(|i| name[i..].to_lowercase())
                .unwrap_or_default();
            let expected_ok = ALLOWED_EXTENSIONS.contains(&extension.as_str());

            prop_assert_eq!(validate_file_name(&name).is_ok(), expected_ok);
        }
    }

    // Every allowed extension maps to a concrete MIME type, never the
    // octet-stream fallback.
    proptest! {
        #[test]
        fn prop_allowed_extensions_have_mime_types(idx in 0usize..12) {
            let ext = ALLOWED_EXTENSIONS[idx];
            prop_assert_ne!(mime_type_for(ext), "application/octet-stream");
        }
    }
}
