use std::path::PathBuf;

use crate::errors::{DfymError, Result};

pub const DB_FILE_NAME: &str = ".dfym.db";

pub struct AppPaths {
    pub db_path: PathBuf,
}

impl AppPaths {
    /// Default location: a dotfile in the user's home directory.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            DfymError::InvalidInput(
                "could not determine home directory; pass --database".to_string(),
            )
        })?;
        Ok(Self::from_home(home))
    }

    pub fn from_home(home: PathBuf) -> Self {
        Self {
            db_path: home.join(DB_FILE_NAME),
        }
    }

    /// An explicit database path (from `--database` or `DFYM_DATABASE`) wins
    /// over the home-directory default.
    pub fn resolve(database: Option<PathBuf>) -> Result<Self> {
        match database {
            Some(db_path) => Ok(Self { db_path }),
            None => Self::new(),
        }
    }
}
