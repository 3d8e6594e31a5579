use clap::{Args, Parser, Subcommand, ValueEnum};

use morph_engine::MorphConfig;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "morph", about = "Convert values between types through an adapter chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a textual value to another type
    Convert(ConvertArgs),
    /// Validate a catalog config and report what it enables
    Check(CheckArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Path to TOML catalog config (all standard policies when omitted)
    #[arg(long, env = "MORPH_CONFIG")]
    pub config: Option<String>,

    /// Target type
    #[arg(long, value_enum)]
    pub to: TargetKind,

    /// Separator used by the `list` target
    #[arg(long, default_value = ",")]
    pub separator: String,

    /// Value to convert
    pub input: String,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Path to TOML catalog config
    #[arg(long, default_value = "morph.toml", env = "MORPH_CONFIG")]
    pub config: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    I64,
    U64,
    F64,
    Bool,
    Char,
    String,
    Json,
    /// `Vec<String>`, split on `--separator`, printed as a JSON array
    List,
}

/// Config from `path`, or the all-enabled default.
pub fn load_config(path: Option<&str>) -> Result<MorphConfig, CliError> {
    match path {
        Some(path) => {
            let config = MorphConfig::load(path)?;
            tracing::debug!(config = %path, "loaded config");
            Ok(config)
        }
        None => Ok(MorphConfig::default()),
    }
}
