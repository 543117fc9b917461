use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cotton_core::{CropField, FertilizerField, Msg};

use super::config::AppConfig;
use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "cotton", version, about = "Cotton leaf disease classifier client")]
pub struct Cli {
    /// Path to a ron config file (defaults to ./cotton.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the inference and recommendation service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, value_enum, global = true)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a single leaf image
    Predict { image: PathBuf },
    /// Ask for a crop recommendation
    Crop(CropArgs),
    /// Ask for a fertilizer recommendation
    Fertilizer(FertilizerArgs),
    /// Interactive session reading commands from stdin
    Shell,
    /// Print the effective configuration
    Config,
}

/// Values are kept as text so the form reports per-field errors itself.
#[derive(Debug, Args)]
pub struct CropArgs {
    #[arg(long)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub nitrogen: Option<String>,
    #[arg(long)]
    pub humidity: Option<String>,
    #[arg(long)]
    pub ph: Option<String>,
    #[arg(long)]
    pub potassium: Option<String>,
    #[arg(long)]
    pub phosphorus: Option<String>,
    #[arg(long)]
    pub rainfall: Option<String>,
}

#[derive(Debug, Args)]
pub struct FertilizerArgs {
    #[arg(long)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub humidity: Option<String>,
    #[arg(long)]
    pub moisture: Option<String>,
    #[arg(long)]
    pub soil_type: Option<String>,
    #[arg(long)]
    pub crop_type: Option<String>,
    #[arg(long)]
    pub nitrogen: Option<String>,
    #[arg(long)]
    pub potassium: Option<String>,
    #[arg(long)]
    pub phosphorous: Option<String>,
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(log) = self.log {
            config.log = log;
        }
    }
}

impl CropArgs {
    /// Field edits followed by the submit message.
    pub fn into_messages(self) -> Vec<Msg> {
        let values = [
            (CropField::Temperature, self.temperature),
            (CropField::Nitrogen, self.nitrogen),
            (CropField::Humidity, self.humidity),
            (CropField::Ph, self.ph),
            (CropField::Potassium, self.potassium),
            (CropField::Phosphorus, self.phosphorus),
            (CropField::Rainfall, self.rainfall),
        ];
        values
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| Msg::CropFieldChanged { field, value }))
            .chain(std::iter::once(Msg::CropSubmitted))
            .collect()
    }
}

impl FertilizerArgs {
    pub fn into_messages(self) -> Vec<Msg> {
        let values = [
            (FertilizerField::Temperature, self.temperature),
            (FertilizerField::Humidity, self.humidity),
            (FertilizerField::Moisture, self.moisture),
            (FertilizerField::SoilType, self.soil_type),
            (FertilizerField::CropType, self.crop_type),
            (FertilizerField::Nitrogen, self.nitrogen),
            (FertilizerField::Potassium, self.potassium),
            (FertilizerField::Phosphorous, self.phosphorous),
        ];
        values
            .into_iter()
            .filter_map(|(field, value)| {
                value.map(|value| Msg::FertilizerFieldChanged { field, value })
            })
            .chain(std::iter::once(Msg::FertilizerSubmitted))
            .collect()
    }
}
