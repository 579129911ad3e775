use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DfymError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DfymError {
    pub fn file_not_tagged(file: &str) -> Self {
        DfymError::NotFound(format!("file is not tagged: {}", file))
    }

    pub fn tag_not_found(tag: &str) -> Self {
        DfymError::NotFound(format!("tag not found: {}", tag))
    }

    /// Process exit code for this error. 2 matches clap's usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            DfymError::NotFound(_) => 3,
            DfymError::InvalidInput(_) => 2,
            DfymError::Storage(_) | DfymError::Output(_) | DfymError::Filesystem { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DfymError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            DfymError::file_not_tagged("/tmp/a.txt").to_string(),
            "Not found: file is not tagged: /tmp/a.txt"
        );
        assert_eq!(
            DfymError::tag_not_found("book").to_string(),
            "Not found: tag not found: book"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DfymError::tag_not_found("x").exit_code(), 3);
        assert_eq!(DfymError::InvalidInput("bad".into()).exit_code(), 2);
        assert_eq!(
            DfymError::Storage(rusqlite::Error::QueryReturnedNoRows).exit_code(),
            1
        );
    }
}
