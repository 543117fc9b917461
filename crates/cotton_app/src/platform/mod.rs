mod app;
mod cli;
mod config;
mod effects;
mod files;
mod logging;
mod ui;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cotton_logging::cotton_info;

use app::Session;
use cli::{Cli, Command};
use config::AppConfig;
use ui::render::{Section, ALL_SECTIONS};

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::initialize(config.log, cli.verbose);
    cotton_info!("cotton {} starting", env!("CARGO_PKG_VERSION"));

    let (sections, msgs) = match cli.command {
        Command::Config => {
            println!("{}", config.to_ron()?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Predict { image } => {
            let selection = files::load_selection(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            (
                vec![Section::Analysis],
                vec![cotton_core::Msg::FilesSelected(vec![selection])],
            )
        }
        Command::Crop(args) => (vec![Section::Crop], args.into_messages()),
        Command::Fertilizer(args) => (vec![Section::Fertilizer], args.into_messages()),
        Command::Shell => {
            let mut session = Session::new(
                config.client_settings()?,
                config.preview_dir.clone(),
                &ALL_SECTIONS,
                io::stdout(),
            )?;
            session.run_shell()?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let mut session = Session::new(
        config.client_settings()?,
        config.preview_dir.clone(),
        &sections,
        io::stdout(),
    )?;
    session.run_until_settled(msgs)?;
    Ok(if session.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
