pub mod models;
pub mod schema;
pub mod sqlite;

use std::path::Path;

use crate::errors::Result;
use models::QueryOptions;

/// Tag-to-path associations. File arguments are canonical absolute paths;
/// tag names are used verbatim.
pub trait TagStorage {
    fn add_tag(&self, tag: &str, file: &str) -> Result<()>;
    fn untag(&self, tag: &str, file: &str) -> Result<()>;
    fn show_tags(&self, file: &str) -> Result<Vec<String>>;
    fn list_tags(&self) -> Result<Vec<String>>;
    fn list_tagged(&self) -> Result<Vec<String>>;
    fn search(&self, tag: &str, opts: &QueryOptions) -> Result<Vec<String>>;
    fn discover_untagged(&self, dir: &Path, opts: &QueryOptions) -> Result<Vec<String>>;
    fn rename_file(&self, from: &str, to: &str) -> Result<()>;
    fn rename_tag(&self, from: &str, to: &str) -> Result<()>;
    fn delete_file(&self, file: &str) -> Result<()>;
    fn delete_tag(&self, tag: &str) -> Result<()>;
}
