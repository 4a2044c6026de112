use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("CFL_GIT_HASH");
    const COMMIT_DATE: &str = env!("CFL_COMMIT_DATE");
    const IS_RELEASE: &str = env!("CFL_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns (default)
    #[default]
    Table,
    /// Pretty-printed JSON, for scripts
    Json,
    /// Tab-separated values, no styling
    Plain,
}

impl OutputFormat {
    pub fn is_machine_readable(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser, Debug)]
#[command(name = "cfl", bin_name = "cfl", version = get_version())]
#[command(about = "Confluence from the command line: search, pages, spaces and attachments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Log requests and decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search content with filters or raw CQL
    #[command(alias = "s", display_order = 1)]
    Search(SearchArgs),

    /// Space operations
    #[command(display_order = 2)]
    Space {
        #[command(subcommand)]
        command: SpaceCommands,
    },

    /// Page operations
    #[command(display_order = 3)]
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Attachment operations
    #[command(alias = "att", display_order = 4)]
    Attachment {
        #[command(subcommand)]
        command: AttachmentCommands,
    },

    /// Get or set configuration
    #[command(display_order = 10)]
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Write the connection settings
    #[command(display_order = 11)]
    Init {
        /// Site URL, e.g. https://example.atlassian.net
        #[arg(long)]
        url: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// API token (https://id.atlassian.com/manage-profile/security/api-tokens)
        #[arg(long)]
        api_token: String,

        /// Space key used when --space is omitted
        #[arg(long)]
        default_space: Option<String>,
    },

    /// Generate shell completions
    #[command(display_order = 12)]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free text to search for
    pub text: Vec<String>,

    /// Raw CQL, used verbatim (all other filters are ignored)
    #[arg(long)]
    pub cql: Option<String>,

    /// Restrict to a space key
    #[arg(long)]
    pub space: Option<String>,

    /// Content type: page, blogpost, attachment, comment
    #[arg(long = "type", value_name = "TYPE")]
    pub content_type: Option<String>,

    /// Title contains
    #[arg(long)]
    pub title: Option<String>,

    /// Has label
    #[arg(long)]
    pub label: Option<String>,

    /// Maximum number of results (0 returns nothing without contacting the server)
    #[arg(short, long, default_value_t = 25, allow_negative_numbers = true)]
    pub limit: i64,
}

#[derive(Subcommand, Debug)]
pub enum SpaceCommands {
    /// List spaces
    #[command(alias = "ls")]
    List {
        #[arg(short, long, default_value_t = 25, allow_negative_numbers = true)]
        limit: i64,
    },

    /// Show one space
    View { key: String },
}

#[derive(Subcommand, Debug)]
pub enum PageCommands {
    /// List pages in a space
    #[command(alias = "ls")]
    List {
        /// Space key (defaults to the configured default space)
        #[arg(long)]
        space: Option<String>,

        #[arg(short, long, default_value_t = 25, allow_negative_numbers = true)]
        limit: i64,
    },

    /// Show a page
    #[command(alias = "v")]
    View {
        id: String,

        /// Print only the storage-format body
        #[arg(long)]
        raw: bool,
    },

    /// Create a page (body from --body, --file, or stdin)
    #[command(alias = "new")]
    Create {
        #[arg(long)]
        title: String,

        /// Space key (defaults to the configured default space)
        #[arg(long)]
        space: Option<String>,

        /// Parent page id
        #[arg(long)]
        parent: Option<String>,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Change a page's title and/or body
    #[command(alias = "e")]
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Delete a page
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct BodyArgs {
    /// Storage-format body
    #[arg(long, conflicts_with = "file")]
    pub body: Option<String>,

    /// Read the body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentCommands {
    /// List attachments of a page
    #[command(alias = "ls")]
    List {
        page_id: String,

        /// Only attachments not referenced in the page body
        #[arg(long)]
        unused: bool,

        #[arg(short, long, default_value_t = 25, allow_negative_numbers = true)]
        limit: i64,
    },

    /// Upload files to a page
    Upload {
        page_id: String,

        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Download an attachment (by id or filename)
    Download {
        page_id: String,

        attachment: String,

        /// Directory to save into
        #[arg(long, short = 'd', default_value = ".")]
        dir: PathBuf,
    },

    /// Delete an attachment
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show all values (environment overrides applied)
    Show,

    /// Print one value
    Get { key: String },

    /// Store a value in the config file
    Set { key: String, value: String },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_filters() {
        let cli = Cli::parse_from([
            "cfl", "search", "k8s", "deploy", "--space", "DEV", "--type", "page", "-l", "5",
        ]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.text, vec!["k8s", "deploy"]);
        assert_eq!(args.space.as_deref(), Some("DEV"));
        assert_eq!(args.content_type.as_deref(), Some("page"));
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn negative_limit_reaches_validation() {
        let cli = Cli::parse_from(["cfl", "search", "x", "--limit", "-1"]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.limit, -1);
    }

    #[test]
    fn global_output_flag_after_subcommand() {
        let cli = Cli::parse_from(["cfl", "space", "list", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn body_and_file_conflict() {
        let result = Cli::try_parse_from([
            "cfl", "page", "edit", "1", "--body", "x", "--file", "y.html",
        ]);
        assert!(result.is_err());
    }
}
