use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use switchyard_core::BodyMapping;
use switchyard_telemetry::LogFormat;

/// Switchyard outbound router
#[derive(Debug, Parser)]
#[command(name = "switchyard", about = "Plan and prepare upstream LLM provider attempts")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml", env = "SWITCHYARD_CONFIG", global = true)]
    pub config: PathBuf,

    /// Log filter directives
    #[arg(long, default_value = "warn", env = "SWITCHYARD_LOG", global = true)]
    pub log: String,

    /// Log line format
    #[arg(long, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the prioritized, fully prepared attempts for a model
    Plan(PlanArgs),
}

#[derive(Debug, clap::Args)]
pub struct PlanArgs {
    /// Logical model to plan for
    #[arg(long)]
    pub model: String,

    /// Prepare streaming requests
    #[arg(long)]
    pub stream: bool,

    /// JSON request body; a one-message chat request when omitted
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// Shape of the request body
    #[arg(long, value_enum, default_value_t = Mapping::Openai)]
    pub mapping: Mapping,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mapping {
    /// `OpenAI` chat completions
    Openai,
    /// `OpenAI` Responses API
    Responses,
    /// Already in the provider's native shape
    Native,
}

impl From<Mapping> for BodyMapping {
    fn from(mapping: Mapping) -> Self {
        match mapping {
            Mapping::Openai => Self::OpenAi,
            Mapping::Responses => Self::Responses,
            Mapping::Native => Self::NoMapping,
        }
    }
}
