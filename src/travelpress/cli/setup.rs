use clap::{Parser, Subcommand};
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
#[command(name = "travelpress", bin_name = "travelpress", version = get_version())]
#[command(about = "Write, publish and browse block-based travel articles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a configured account
    Login {
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Publish a new article from a Markdown manuscript
    Publish {
        manuscript: PathBuf,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        province: String,
    },

    /// List articles, newest first
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Only articles from this province
        #[arg(long)]
        province: Option<String>,

        /// Filter the page by title or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Read an article
    View { id: String },

    /// Replace an article's blocks with a manuscript
    Edit { id: String, manuscript: PathBuf },

    /// Delete an article you own
    #[command(alias = "rm")]
    Delete { id: String },

    /// Print an article as a manuscript
    Export {
        id: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Get or set configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}
