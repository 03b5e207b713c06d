use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "kronoscope",
    about = "Corpus analysis backend for an investigative-journalism dashboard"
)]
pub struct Cli {
    /// Override the corpus source directory
    #[arg(long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log warnings and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List selectable corpus folders
    Folders {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank the most frequent words in the selected folders
    Wordcloud(WordcloudArgs),
    /// Answer a question from the selected folders via the hosted model
    Ask(AskArgs),
    /// Print the people/organizations graph fixture
    People,
    /// Look up a person's resume text
    Resume {
        /// Person name as used in `Resume-<name>.txt`
        name: String,
    },
    /// Generate the 2-D similarity report for the selected sources
    Report(ReportArgs),
    /// Embed the news-article tree into the persistent store
    Bootstrap,
    /// Show configuration and store statistics
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Wordcloud --

#[derive(Debug, Parser)]
pub struct WordcloudArgs {
    /// Folders to include (repeatable)
    #[arg(short, long = "folder", required = true)]
    pub folders: Vec<String>,

    /// Number of ranked words to return
    #[arg(short = 'n', long, default_value = "50")]
    pub words: usize,
}

// -- Ask --

#[derive(Debug, Parser)]
pub struct AskArgs {
    /// The question to answer
    pub query: String,

    /// Folders to use as context (repeatable)
    #[arg(short, long = "folder", required = true)]
    pub folders: Vec<String>,
}

// -- Report --

#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Metadata sources to include (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "kronoscope",
            &mut std::io::stdout(),
        );
    }
}
