use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minutes")]
#[command(
    author,
    version = env!("MINUTES_VERSION_INFO"),
    about = "Structured meeting minutes from transcripts, powered by an LLM"
)]
#[command(
    long_about = "Turn a meeting transcript or recording into summaries, action items with resolved deadlines, a timeline and speaker sentiment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate minutes from a transcript (.txt, .md, .pdf) or recording (.wav)
    Process {
        file: PathBuf,

        #[command(flatten)]
        request: RequestArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate minutes from a JSON request document ("-" reads stdin)
    Request {
        file: PathBuf,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the prompt that would be sent to the model, without calling it
    Prompt {
        file: PathBuf,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print the transcript extracted from a text file, PDF or WAV recording
    Transcribe {
        file: PathBuf,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Whisper model management
    Models {
        #[command(subcommand)]
        action: ModelCommands,
    },
}

/// Per-request options; unset flags fall back to the [defaults] config section
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Meeting title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Meeting date (YYYY-MM-DD), enables relative deadline resolution
    #[arg(short, long)]
    pub date: Option<String>,

    /// Ignore speaker labels
    #[arg(long)]
    pub no_speakers: bool,

    /// Skip per-speaker sentiment
    #[arg(long)]
    pub no_sentiment: bool,

    /// Skip the timeline
    #[arg(long)]
    pub no_timeline: bool,

    /// Language for the generated text
    #[arg(short, long)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print config file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// List available Whisper models
    List,
    /// Download a Whisper model
    Download {
        /// Model name: tiny, base, small, medium, large-v3-turbo
        model: String,
    },
    /// Delete a downloaded model
    Delete { model: String },
}
