use clap::{Parser, Subcommand};
use notepad::model::{FilenameFormat, SortOrder};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "notepad", bin_name = "notepad", version = get_version())]
#[command(about = "Plain text notes with drafts, import and export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log what the library is doing (NOTEPAD_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a note from arguments, piped stdin, or the editor
    #[command(alias = "n", display_order = 1)]
    New {
        /// Note text (words are joined with spaces)
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// List notes
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Sort order, saved as the new default (date-desc, date-asc, title-asc, title-desc)
        #[arg(short, long)]
        sort: Option<SortOrder>,
    },

    /// Search titles and bodies
    #[command(display_order = 3)]
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// Show a note
    #[command(alias = "v", display_order = 10)]
    View { id: i64 },

    /// Edit a note in $EDITOR (without an id: resume a draft or start a new note)
    #[command(alias = "e", display_order = 11)]
    Edit { id: Option<i64> },

    /// Delete one or more notes
    #[command(alias = "rm", display_order = 12)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Copy a note to the clipboard
    #[command(display_order = 13)]
    Share { id: i64 },

    /// Print a note for paper (plain text on stdout)
    #[command(display_order = 14)]
    Print { id: i64 },

    /// Import files or directories as notes
    #[command(display_order = 20)]
    Import {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// Export notes as files (all notes when no ids are given)
    #[command(display_order = 21)]
    Export {
        ids: Vec<i64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Filename format, saved as the new default (title, title-timestamp, timestamp-title)
        #[arg(short, long)]
        format: Option<FilenameFormat>,

        /// Write a single .tar.gz archive to this path instead
        #[arg(long, value_name = "FILE", conflicts_with = "dir")]
        archive: Option<PathBuf>,
    },

    /// Get or set preferences (lists all without arguments)
    #[command(display_order = 30)]
    Prefs {
        key: Option<String>,
        value: Option<String>,
    },

    /// Set the user name
    #[command(display_order = 31)]
    Login {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Clear the user name
    #[command(display_order = 32)]
    Logout,

    /// Show the user name
    #[command(display_order = 33)]
    Whoami,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_sort() {
        let cli = Cli::try_parse_from(["notepad", "list", "--sort", "title-asc"]).unwrap();
        match cli.command {
            Some(Commands::List { sort }) => assert_eq!(sort, Some(SortOrder::TitleAscending)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["notepad", "list", "--sort", "size"]).is_err());
    }

    #[test]
    fn test_parse_new_joins_words() {
        let cli = Cli::try_parse_from(["notepad", "new", "buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::New { text }) => assert_eq!(text.join(" "), "buy milk"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_archive_conflicts_with_dir() {
        assert!(Cli::try_parse_from([
            "notepad", "export", "--dir", "out", "--archive", "notes.tar.gz"
        ])
        .is_err());
    }
}
