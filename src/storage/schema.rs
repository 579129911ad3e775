pub const CREATE_TAGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    )
";

pub const CREATE_FILES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    )
";

pub const CREATE_TAGGINGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS taggings (
        id INTEGER PRIMARY KEY,
        tag_id INTEGER NOT NULL,
        file_id INTEGER NOT NULL,
        CONSTRAINT UniqueTagging UNIQUE (tag_id, file_id),
        FOREIGN KEY (tag_id) REFERENCES tags(id),
        FOREIGN KEY (file_id) REFERENCES files(id)
    )
";

// (tag_id, file_id) is covered by the unique constraint.
pub const CREATE_INDEX_TAGGINGS_FILE_ID: &str =
    "CREATE INDEX IF NOT EXISTS idx_taggings_file_id ON taggings(file_id)";
