use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use dfym::config::AppPaths;
use dfym::errors::{DfymError, Result};
use dfym::fs;
use dfym::logging;
use dfym::storage::TagStorage;
use dfym::storage::models::{EntryKind, QueryOptions};
use dfym::storage::sqlite::SqliteStorage;

#[derive(Parser)]
#[command(name = "dfym", version, about = "Tag files and directories from the command line")]
struct Cli {
    /// Tag database to use [default: ~/.dfym.db]
    #[arg(long, global = true, env = "DFYM_DATABASE")]
    database: Option<PathBuf>,

    /// Output results as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Log more detail to stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach a tag to one or more paths
    Tag {
        /// Tag name
        tag: String,

        /// Existing files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove a tag from one or more paths
    Untag {
        /// Tag name
        tag: String,

        /// Tagged files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show the tags attached to a path
    Show {
        path: PathBuf,
    },

    /// List all tags
    Tags,

    /// List all tagged paths
    Tagged,

    /// List paths carrying a tag
    Search {
        /// Tag name
        tag: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// List entries of a directory that carry no tag
    Discover {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Point a tagged path's tags at a new path
    Rename {
        from: PathBuf,
        to: PathBuf,
    },

    /// Rename a tag
    RenameTag {
        from: String,
        to: String,
    },

    /// Forget a path and all of its tags
    Delete {
        path: PathBuf,
    },

    /// Delete a tag, its taggings, and any path left without tags
    DeleteTag {
        tag: String,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Maximum number of results, 0 for no limit
    #[arg(short = 'n', long, default_value = "0")]
    limit: usize,

    /// Only regular files
    #[arg(short, long, conflicts_with = "dirs")]
    files: bool,

    /// Only directories
    #[arg(short, long)]
    dirs: bool,

    /// Random order
    #[arg(short, long)]
    random: bool,
}

impl QueryArgs {
    fn to_options(&self) -> QueryOptions {
        let kind = if self.files {
            EntryKind::Files
        } else if self.dirs {
            EntryKind::Directories
        } else {
            EntryKind::Any
        };
        QueryOptions {
            limit: self.limit,
            kind,
            random: self.random,
        }
    }
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct ShowResponse<'a> {
    file: &'a str,
    tags: &'a [String],
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        if json {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = AppPaths::resolve(cli.database)?;
    debug!(db = %paths.db_path.display(), "using tag database");
    let storage = SqliteStorage::open(&paths.db_path)?;
    let json = cli.json;

    match cli.command {
        Commands::Tag { tag, paths } => cmd_tag(&storage, &tag, &paths, json),
        Commands::Untag { tag, paths } => cmd_untag(&storage, &tag, &paths, json),
        Commands::Show { path } => cmd_show(&storage, &path, json),
        Commands::Tags => print_list(&storage.list_tags()?, json),
        Commands::Tagged => print_list(&storage.list_tagged()?, json),
        Commands::Search { tag, query } => {
            print_list(&storage.search(&tag, &query.to_options())?, json)
        }
        Commands::Discover { dir, query } => cmd_discover(&storage, &dir, &query, json),
        Commands::Rename { from, to } => cmd_rename(&storage, &from, &to, json),
        Commands::RenameTag { from, to } => {
            storage.rename_tag(&from, &to)?;
            print_status(format!("Renamed tag \"{}\" to \"{}\".", from, to), json)
        }
        Commands::Delete { path } => {
            let file = fs::resolve(&path)?;
            storage.delete_file(&file)?;
            print_status(format!("Deleted {} and its tags.", file), json)
        }
        Commands::DeleteTag { tag } => {
            storage.delete_tag(&tag)?;
            print_status(format!("Deleted tag \"{}\".", tag), json)
        }
    }
}

fn cmd_tag(storage: &dyn TagStorage, tag: &str, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut last = String::new();
    for path in paths {
        let file = fs::canonicalize(path)?;
        storage.add_tag(tag, &file)?;
        last = file;
    }
    let message = match paths.len() {
        1 => format!("Added tag \"{}\" to {}.", tag, last),
        n => format!("Added tag \"{}\" to {} paths.", tag, n),
    };
    print_status(message, json)
}

fn cmd_untag(storage: &dyn TagStorage, tag: &str, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut last = String::new();
    for path in paths {
        let file = fs::resolve(path)?;
        storage.untag(tag, &file)?;
        last = file;
    }
    let message = match paths.len() {
        1 => format!("Removed tag \"{}\" from {}.", tag, last),
        n => format!("Removed tag \"{}\" from {} paths.", tag, n),
    };
    print_status(message, json)
}

fn cmd_show(storage: &dyn TagStorage, path: &Path, json: bool) -> Result<()> {
    let file = fs::resolve(path)?;
    let tags = storage.show_tags(&file)?;
    if json {
        println!("{}", serde_json::to_string(&ShowResponse { file: &file, tags: &tags })?);
        return Ok(());
    }
    print_list(&tags, false)
}

fn cmd_discover(storage: &dyn TagStorage, dir: &Path, query: &QueryArgs, json: bool) -> Result<()> {
    let dir = fs::canonicalize(dir)?;
    if !fs::is_directory(Path::new(&dir)) {
        return Err(DfymError::InvalidInput(format!("not a directory: {}", dir)));
    }
    let found = storage.discover_untagged(Path::new(&dir), &query.to_options())?;
    print_list(&found, json)
}

fn cmd_rename(storage: &dyn TagStorage, from: &Path, to: &Path, json: bool) -> Result<()> {
    let from = fs::resolve(from)?;
    let to = fs::resolve(to)?;
    storage.rename_file(&from, &to)?;
    print_status(format!("Renamed {} to {}.", from, to), json)
}

fn print_list(items: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(items)?);
        return Ok(());
    }
    for item in items {
        println!("{}", item);
    }
    Ok(())
}

fn print_status(message: String, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(&StatusResponse {
                success: true,
                message,
            })?
        );
    } else {
        println!("{}", message);
    }
    Ok(())
}
