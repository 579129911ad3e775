use std::fs;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Params, params};
use tracing::{debug, info};

use crate::errors::{DfymError, Result};
use crate::fs::list_directory;
use super::TagStorage;
use super::models::QueryOptions;
use super::schema;

// Files left without any tagging are removed; tags are never pruned implicitly.
const PRUNE_ORPHAN_FILES: &str =
    "DELETE FROM files WHERE id NOT IN (SELECT file_id FROM taggings)";

pub struct SqliteStorage {
    conn: Connection,
}

fn file_id(conn: &Connection, file: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row("SELECT id FROM files WHERE name = ?", params![file], |row| row.get(0))
        .optional()?)
}

fn tag_id(conn: &Connection, tag: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row("SELECT id FROM tags WHERE name = ?", params![tag], |row| row.get(0))
        .optional()?)
}

fn query_names<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let names = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

impl SqliteStorage {
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute(schema::CREATE_TAGS_TABLE, [])?;
        conn.execute(schema::CREATE_FILES_TABLE, [])?;
        conn.execute(schema::CREATE_TAGGINGS_TABLE, [])?;
        conn.execute(schema::CREATE_INDEX_TAGGINGS_FILE_ID, [])?;
        Ok(Self { conn })
    }

    /// Opens the database at `path`, creating it, its parent directories and
    /// the schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| DfymError::Filesystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug!(path = %path.display(), "opening tag database");
        let conn = Connection::open(path)?;
        Self::new(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::new(conn)
    }

    #[cfg(test)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl TagStorage for SqliteStorage {
    fn add_tag(&self, tag: &str, file: &str) -> Result<()> {
        debug!(tag, file, "adding tag");
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?)", params![tag])?;
        let tag_id: i64 =
            tx.query_row("SELECT id FROM tags WHERE name = ?", params![tag], |row| row.get(0))?;
        tx.execute("INSERT OR IGNORE INTO files (name) VALUES (?)", params![file])?;
        let file_id: i64 =
            tx.query_row("SELECT id FROM files WHERE name = ?", params![file], |row| row.get(0))?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO taggings (tag_id, file_id) VALUES (?1, ?2)",
            params![tag_id, file_id],
        )?;
        tx.commit()?;
        if inserted > 0 {
            info!(tag, file, "tagged");
        }
        Ok(())
    }

    fn untag(&self, tag: &str, file: &str) -> Result<()> {
        debug!(tag, file, "removing tag");
        let tx = self.conn.unchecked_transaction()?;
        let file_id = file_id(&tx, file)?.ok_or_else(|| DfymError::file_not_tagged(file))?;
        tx.execute(
            "DELETE FROM taggings
             WHERE file_id = ?1 AND tag_id IN (SELECT id FROM tags WHERE name = ?2)",
            params![file_id, tag],
        )?;
        let pruned = tx.execute(PRUNE_ORPHAN_FILES, [])?;
        tx.commit()?;
        info!(tag, file, pruned, "untagged");
        Ok(())
    }

    fn show_tags(&self, file: &str) -> Result<Vec<String>> {
        debug!(file, "showing tags");
        let file_id = file_id(&self.conn, file)?.ok_or_else(|| DfymError::file_not_tagged(file))?;
        query_names(
            &self.conn,
            "SELECT t.name FROM taggings tg
             JOIN tags t ON t.id = tg.tag_id
             WHERE tg.file_id = ?
             ORDER BY tg.id",
            params![file_id],
        )
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        query_names(&self.conn, "SELECT name FROM tags ORDER BY id", [])
    }

    fn list_tagged(&self) -> Result<Vec<String>> {
        query_names(&self.conn, "SELECT name FROM files ORDER BY id", [])
    }

    fn search(&self, tag: &str, opts: &QueryOptions) -> Result<Vec<String>> {
        debug!(tag, ?opts, "searching");
        let candidates = query_names(
            &self.conn,
            "SELECT f.name FROM taggings tg
             JOIN tags t ON t.id = tg.tag_id
             JOIN files f ON f.id = tg.file_id
             WHERE t.name = ?
             ORDER BY tg.id",
            params![tag],
        )?;
        Ok(opts.select(candidates))
    }

    fn discover_untagged(&self, dir: &Path, opts: &QueryOptions) -> Result<Vec<String>> {
        debug!(dir = %dir.display(), ?opts, "discovering untagged entries");
        let mut entries: Vec<String> = list_directory(dir)?
            .into_iter()
            .map(|name| dir.join(name).to_string_lossy().into_owned())
            .collect();
        entries.sort();

        let mut known = self.conn.prepare("SELECT 1 FROM files WHERE name = ?")?;
        let mut untagged = Vec::with_capacity(entries.len());
        for entry in entries {
            if !known.exists(params![entry])? {
                untagged.push(entry);
            }
        }
        Ok(opts.select(untagged))
    }

    fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        debug!(from, to, "renaming file");
        let changes = self
            .conn
            .execute("UPDATE files SET name = ?1 WHERE name = ?2", params![to, from])?;
        if changes == 0 {
            return Err(DfymError::file_not_tagged(from));
        }
        info!(from, to, "renamed file");
        Ok(())
    }

    fn rename_tag(&self, from: &str, to: &str) -> Result<()> {
        debug!(from, to, "renaming tag");
        let changes = self
            .conn
            .execute("UPDATE tags SET name = ?1 WHERE name = ?2", params![to, from])?;
        if changes == 0 {
            return Err(DfymError::tag_not_found(from));
        }
        info!(from, to, "renamed tag");
        Ok(())
    }

    fn delete_file(&self, file: &str) -> Result<()> {
        debug!(file, "deleting file");
        let tx = self.conn.unchecked_transaction()?;
        let file_id = file_id(&tx, file)?.ok_or_else(|| DfymError::file_not_tagged(file))?;
        let removed = tx.execute("DELETE FROM taggings WHERE file_id = ?", params![file_id])?;
        tx.execute("DELETE FROM files WHERE id = ?", params![file_id])?;
        tx.commit()?;
        info!(file, taggings = removed, "deleted file");
        Ok(())
    }

    fn delete_tag(&self, tag: &str) -> Result<()> {
        debug!(tag, "deleting tag");
        let tx = self.conn.unchecked_transaction()?;
        let tag_id = tag_id(&tx, tag)?.ok_or_else(|| DfymError::tag_not_found(tag))?;
        let removed = tx.execute("DELETE FROM taggings WHERE tag_id = ?", params![tag_id])?;
        let pruned = tx.execute(PRUNE_ORPHAN_FILES, [])?;
        tx.execute("DELETE FROM tags WHERE id = ?", params![tag_id])?;
        tx.commit()?;
        info!(tag, taggings = removed, pruned, "deleted tag");
        Ok(())
    }
}
