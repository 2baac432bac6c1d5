//! CLI argument definitions for the Rapport response parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rapport",
    version,
    about = "Rapport response parser - decode unreliable AI replies into typed results",
    long_about = "Decode unreliable AI model replies into typed results.\n\n\
                  Strips markdown fences and surrounding prose, repairs escaped Unicode\n\
                  and truncated JSON, maps alternate field names onto the canonical\n\
                  schema, and degrades to defaults when nothing else works."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw reply text in log output.
    ///
    /// Replies can quote private conversation content. By default any
    /// logged reply text is replaced with a redaction placeholder; this
    /// flag logs it verbatim.
    #[arg(long = "log-content", global = true)]
    pub log_content: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a model reply into a typed result.
    Parse(ParseArgs),

    /// Run only the cleaning stage and print the cleaned JSON.
    Clean(CleanArgs),

    /// List canonical fields and their registered alternate names.
    Mappings(MappingsArgs),
}

#[derive(Parser)]
pub struct ParseArgs {
    /// File holding the raw reply (reads stdin when omitted).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Result type the reply is supposed to contain.
    #[arg(long = "target", value_enum, default_value = "analysis")]
    pub target: TargetArg,

    /// Name of the model that produced the reply (diagnostics only).
    #[arg(long = "model", default_value = "unknown")]
    pub model: String,

    /// Correlation id recorded with every log line.
    #[arg(long = "operation-id", value_name = "ID", default_value = "cli")]
    pub operation_id: String,

    /// Enable aggressive last-resort JSON repair.
    #[arg(long = "fuzzy-repair")]
    pub fuzzy_repair: bool,

    /// Keep escaped `\uXXXX` sequences as-is.
    #[arg(long = "no-unicode-fix")]
    pub no_unicode_fix: bool,

    /// Skip insertion of commas missing between object members.
    #[arg(long = "no-structure-fix")]
    pub no_structure_fix: bool,

    /// Rewrite keys that are merely similar to a registered name.
    #[arg(long = "fuzzy-match")]
    pub fuzzy_match: bool,

    /// Minimum similarity for a fuzzy key rewrite, between 0 and 1.
    #[arg(long = "threshold", value_name = "SIMILARITY", default_value_t = 0.8)]
    pub threshold: f64,

    /// Never synthesize missing mandatory fields.
    #[arg(long = "no-infer")]
    pub no_infer: bool,

    /// JSON file with extra field mappings (canonical name -> alternate list).
    #[arg(long = "mappings", value_name = "FILE")]
    pub mappings: Option<PathBuf>,

    /// Output format for the parse outcome.
    #[arg(long = "output", value_enum, default_value = "text")]
    pub output: OutputArg,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// File holding the raw reply (reads stdin when omitted).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Enable aggressive last-resort JSON repair.
    #[arg(long = "fuzzy-repair")]
    pub fuzzy_repair: bool,

    /// Keep escaped `\uXXXX` sequences as-is.
    #[arg(long = "no-unicode-fix")]
    pub no_unicode_fix: bool,

    /// Skip insertion of commas missing between object members.
    #[arg(long = "no-structure-fix")]
    pub no_structure_fix: bool,
}

#[derive(Parser)]
pub struct MappingsArgs {
    /// JSON file with extra field mappings (canonical name -> alternate list).
    #[arg(long = "mappings", value_name = "FILE")]
    pub mappings: Option<PathBuf>,
}

/// CLI parse target choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum TargetArg {
    /// Analysis of a received conversation message.
    Analysis,
    /// Safety check of an outbound message.
    Safety,
    /// Facts extracted from a conversation window.
    Facts,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// CLI outcome rendering choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    Text,
    Json,
}
