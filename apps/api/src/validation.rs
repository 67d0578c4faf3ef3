//! Input validation for uploads, extracted text, and analysis settings.
//!
//! Everything here is pure; failures become `AppError::Validation` (bad
//! request) or `AppError::UnprocessableEntity` at the handler boundary.

use crate::config::{
    ALLOWED_FILE_TYPES, MAX_CHUNK_OVERLAP, MAX_CHUNK_SIZE, MAX_FILE_SIZE_BYTES,
    MAX_RESUME_TEXT_LENGTH, MAX_TARGET_ROLE_LENGTH, MIN_CHUNK_SIZE, MIN_RESUME_TEXT_LENGTH,
};

/// Validates one uploaded file's name and size. Returns the lowercased
/// extension on success.
pub fn validate_upload(filename: &str, size: usize) -> Result<String, String> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_FILE_TYPES.contains(&extension.as_str()) {
        return Err(format!(
            "File type '.{extension}' not allowed. Allowed types: {}",
            ALLOWED_FILE_TYPES.join(", ")
        ));
    }

    if size > MAX_FILE_SIZE_BYTES {
        return Err(format!(
            "File '{filename}' is {:.1}MB, exceeds maximum size of {}MB",
            size as f64 / (1024.0 * 1024.0),
            MAX_FILE_SIZE_BYTES / (1024 * 1024)
        ));
    }

    // Resumes shouldn't be empty or tiny.
    if size < 100 {
        return Err(format!(
            "File '{filename}' is too small ({size} bytes). May be empty or corrupted."
        ));
    }

    Ok(extension)
}

/// Validates extracted resume text length.
pub fn validate_extracted_text(text: &str, filename: &str) -> Result<(), String> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(format!(
            "No text could be extracted from '{filename}'. File may be empty, corrupted, or a scanned image PDF."
        ));
    }

    let length = trimmed.chars().count();

    if length < MIN_RESUME_TEXT_LENGTH {
        return Err(format!(
            "Extracted text from '{filename}' is too short ({length} characters). Minimum: {MIN_RESUME_TEXT_LENGTH}."
        ));
    }

    if length > MAX_RESUME_TEXT_LENGTH {
        return Err(format!(
            "Extracted text from '{filename}' is too long ({length} characters). Maximum: {MAX_RESUME_TEXT_LENGTH}."
        ));
    }

    Ok(())
}

/// Validates segmentation parameters.
pub fn validate_chunk_params(size: usize, overlap: usize) -> Result<(), String> {
    if size < MIN_CHUNK_SIZE {
        return Err(format!(
            "Chunk size ({size}) is too small. Minimum: {MIN_CHUNK_SIZE}"
        ));
    }
    if size > MAX_CHUNK_SIZE {
        return Err(format!(
            "Chunk size ({size}) is too large. Maximum: {MAX_CHUNK_SIZE}"
        ));
    }
    if overlap > MAX_CHUNK_OVERLAP {
        return Err(format!(
            "Chunk overlap ({overlap}) is too large. Maximum: {MAX_CHUNK_OVERLAP}"
        ));
    }
    if overlap >= size {
        return Err(format!(
            "Chunk overlap ({overlap}) must be less than chunk size ({size})"
        ));
    }
    Ok(())
}

/// Validates the optional target-role hint.
pub fn validate_target_role(target_role: &str) -> Result<(), String> {
    if target_role.chars().count() > MAX_TARGET_ROLE_LENGTH {
        return Err(format!(
            "Target job role is too long (max {MAX_TARGET_ROLE_LENGTH} characters)"
        ));
    }
    Ok(())
}

/// Sanitizes a filename for use in paths and database rows: strips directory
/// separators, NUL bytes, and non-portable characters, and caps the length.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .filter(|&c| c != '\0')
        .filter(|&c| c.is_ascii_alphanumeric() || c == ' ' || c == '.' || c == '-' || c == '_')
        .collect();

    let capped = if cleaned.len() > 255 {
        match cleaned.rsplit_once('.') {
            Some((name, ext)) => {
                let head: String = name.chars().take(250).collect();
                format!("{head}.{ext}")
            }
            None => cleaned.chars().take(255).collect(),
        }
    } else {
        cleaned
    };

    if capped.is_empty() {
        "unnamed_file".to_string()
    } else {
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_accepts_pdf_and_txt() {
        assert_eq!(validate_upload("resume.pdf", 5000).unwrap(), "pdf");
        assert_eq!(validate_upload("resume.TXT", 5000).unwrap(), "txt");
    }

    #[test]
    fn test_upload_rejects_other_extensions() {
        assert!(validate_upload("resume.docx", 5000).is_err());
        assert!(validate_upload("resume", 5000).is_err());
    }

    #[test]
    fn test_upload_rejects_oversize_and_tiny_files() {
        assert!(validate_upload("resume.pdf", MAX_FILE_SIZE_BYTES + 1).is_err());
        assert!(validate_upload("resume.pdf", 10).is_err());
    }

    #[test]
    fn test_text_length_bounds() {
        assert!(validate_extracted_text("", "r.txt").is_err());
        assert!(validate_extracted_text("too short", "r.txt").is_err());
        assert!(validate_extracted_text(&"a".repeat(150), "r.txt").is_ok());
        assert!(validate_extracted_text(&"a".repeat(MAX_RESUME_TEXT_LENGTH + 1), "r.txt").is_err());
    }

    #[test]
    fn test_chunk_param_bounds() {
        assert!(validate_chunk_params(4000, 300).is_ok());
        assert!(validate_chunk_params(MIN_CHUNK_SIZE - 1, 0).is_err());
        assert!(validate_chunk_params(MAX_CHUNK_SIZE + 1, 0).is_err());
        assert!(validate_chunk_params(2000, MAX_CHUNK_OVERLAP + 1).is_err());
        assert!(validate_chunk_params(1000, 1000).is_err());
    }

    #[test]
    fn test_target_role_length() {
        assert!(validate_target_role("Backend Engineer").is_ok());
        assert!(validate_target_role(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("a\\b.pdf"), "a_b.pdf");
    }

    #[test]
    fn test_sanitize_strips_odd_characters() {
        assert_eq!(sanitize_filename("re$ume(final)!.pdf"), "reumefinal.pdf");
    }

    #[test]
    fn test_sanitize_empty_becomes_placeholder() {
        assert_eq!(sanitize_filename("###"), "unnamed_file");
    }

    #[test]
    fn test_sanitize_caps_length_keeping_extension() {
        let long = format!("{}.pdf", "n".repeat(300));
        let out = sanitize_filename(&long);
        assert!(out.len() <= 255);
        assert!(out.ends_with(".pdf"));
    }
}
