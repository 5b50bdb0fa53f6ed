
use thiserror::Error;

use crate::pipeline::RawUpload;

/// Canonical MIME type accepted for upload.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Upper bound on upload size: 1 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 1_048_576;

/// Rejection reasons, one per rule. The Display strings are the user-visible
/// rejection messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid Document Type")]
    InvalidType,
    #[error("Invalid Document Size")]
    InvalidSize,
}

/// Gatekeeper applied before anything is persisted. Rules run in a fixed
/// order (type before size) and the first failure decides the reason. Pure
/// function of the upload.
#[inline]
pub fn validate(upload: &RawUpload) -> Result<(), ValidationError> {
    if upload.content_type != PDF_CONTENT_TYPE {
        return Err(ValidationError::InvalidType);
    }

    if upload.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::InvalidSize);
    }

    Ok(())
}
