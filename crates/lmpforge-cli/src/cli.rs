use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "lmpforge - Convert crystal structures into LAMMPS-ready data files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a structure document into a LAMMPS data file.
    Generate(GenerateArgs),
    /// Validate a structure document and report its geometry.
    Check(CheckArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the input structure document (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output data file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Atom style of the Atoms section ('atomic' or 'charge').
    #[arg(short = 's', long, default_value = "atomic", value_name = "STYLE")]
    pub atom_style: String,

    /// Per-kind charge override for the 'charge' style.
    /// Can be used multiple times. Example: -c Li=1.0 -c F=-1.0
    #[arg(short = 'c', long = "charge", value_name = "LABEL=VALUE")]
    pub charges: Vec<String>,

    /// Round cell and position values to this many decimal places.
    #[arg(long, value_name = "INT")]
    pub round_dp: Option<u32>,

    /// Header comment for the first line of the data file.
    /// Defaults to the document's comment, then to a generic header.
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the structure document (TOML) to validate.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}
