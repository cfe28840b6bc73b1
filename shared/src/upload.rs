use thiserror::Error;

pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload a valid file (PDF, Word, or Image)")]
    InvalidType(String),
    #[error("File size must be less than 100MB")]
    TooLarge { size: u64, limit: u64 },
}

/// What the browser tells us about a picked or dropped file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_mime: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_mime: ALLOWED_MIME_TYPES.iter().map(|mime| mime.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    pub fn validate(&self, file: &FileInfo) -> Result<(), UploadError> {
        if !self.allowed_mime.iter().any(|mime| mime == &file.mime) {
            return Err(UploadError::InvalidType(file.mime.clone()));
        }
        if file.size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn file(mime: &str, size: u64) -> FileInfo {
        FileInfo {
            name: "doc".into(),
            mime: mime.into(),
            size,
        }
    }

    #[test]
    fn accepts_a_99_mib_pdf() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.validate(&file("application/pdf", 99 * MIB)), Ok(()));
        assert_eq!(policy.validate(&file("image/png", MAX_UPLOAD_BYTES)), Ok(()));
    }

    #[test]
    fn rejects_a_101_mib_file() {
        let policy = UploadPolicy::default();
        let error = policy.validate(&file("application/pdf", 101 * MIB)).unwrap_err();
        assert_eq!(
            error,
            UploadError::TooLarge {
                size: 101 * MIB,
                limit: MAX_UPLOAD_BYTES
            }
        );
        assert_eq!(error.to_string(), "File size must be less than 100MB");
    }

    #[test]
    fn rejects_plain_text() {
        let policy = UploadPolicy::default();
        let error = policy.validate(&file("text/plain", 10)).unwrap_err();
        assert_eq!(error, UploadError::InvalidType("text/plain".into()));
        assert!(matches!(
            policy.validate(&file("", 10)),
            Err(UploadError::InvalidType(_))
        ));
    }

    #[test]
    fn type_is_checked_before_size() {
        let policy = UploadPolicy::default();
        assert!(matches!(
            policy.validate(&file("text/plain", 200 * MIB)),
            Err(UploadError::InvalidType(_))
        ));
    }
}
