use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    New,
    Read,
    Replied,
    Archived,
}

impl StatusArg {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusArg::New => "new",
            StatusArg::Read => "read",
            StatusArg::Replied => "replied",
            StatusArg::Archived => "archived",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "okul",
    bin_name = "okul",
    version,
    disable_help_subcommand = true,
    after_help = "Enable shell completions:\n  eval \"$(okul completions bash)\"  # add to ~/.bashrc\n  eval \"$(okul completions zsh)\"   # add to ~/.zshrc"
)]
#[command(about = "Edit and preview the school website's pages and lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $OKUL_DATA, ./.okul or the user data dir)
    #[arg(long, global = true, help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List pages and their routes
    #[command(display_order = 1)]
    Pages,

    /// Show the sections of a page and which ones are stored
    #[command(display_order = 2)]
    Sections {
        /// Page key or route (e.g. about, /hakkimizda)
        page: String,
    },

    /// Show one section's content as the editor sees it
    #[command(display_order = 3)]
    Show {
        /// Page key or route
        page: String,
        /// Section id (e.g. hero, faq)
        section: String,
    },

    /// Save one section
    #[command(display_order = 4)]
    Set {
        /// Page key or route
        page: String,
        /// Section id
        section: String,

        /// New content: plain text or HTML, or JSON for card, team and FAQ sections
        #[arg(long, short = 't', conflicts_with = "file")]
        text: Option<String>,

        /// Read the new content from a file
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// Upload an image for the section
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,

        /// Remove the section's image
        #[arg(long)]
        remove_image: bool,

        /// Button label
        #[arg(long)]
        button_text: Option<String>,

        /// Button link
        #[arg(long)]
        button_url: Option<String>,
    },

    /// Set a page's SEO title, description or keywords
    #[command(display_order = 5)]
    Meta {
        /// Page key or route
        page: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
    },

    /// Render a page as visitors see it
    #[command(display_order = 6)]
    Render {
        /// Page key or route
        target: String,
    },

    /// List entries of a collection (teachers, events, gallery, ...)
    #[command(alias = "ls", display_order = 10)]
    List {
        /// Entity kind or collection name
        kind: String,
        /// Only entries in this category
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Add an entry
    #[command(display_order = 11)]
    Add {
        kind: String,
        /// Field assignments (e.g. -f name="Ayşe Kaya" -f order=2)
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,
        /// Image to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Change fields of an entry
    #[command(display_order = 12)]
    Update {
        kind: String,
        id: String,
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,
        /// Replacement image
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete an entry and its image
    #[command(alias = "rm", display_order = 13)]
    Delete { kind: String, id: String },

    /// Set the status of a contact message
    #[command(display_order = 14)]
    Status {
        id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Generate shell completions
    #[command(display_order = 31)]
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the value of a key
    Get { key: String },
    /// Set a key in okul.toml
    Set { key: String, value: String },
    /// Print a sample okul.toml
    Gen {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub fn build_command() -> clap::Command {
    Cli::command()
}
