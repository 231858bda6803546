use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, info};

use folders_cli::cli_args::Args;
use folders_cli::dry_run::DryRunSpawner;
use folders_cli::host::TerminalHost;
use folders_core::config::{self, Settings};
use folders_core::dispatch::MainContext;
use folders_core::error::Result;
use folders_core::file_handling;
use folders_core::picker::FolderPicker;
use folders_core::runner::ProcessRunner;
use folders_core::spawn::{Spawner, SystemSpawner};

/// Load the settings file and apply command-line overrides
fn initialize_settings(args: &Args) -> Result<Settings> {
    let settings_path = config::get_settings_path(&args.config_path);
    debug!("Settings path: `{settings_path}`");

    let settings = file_handling::get_settings(&settings_path)?;
    Ok(args.apply_overrides(settings))
}

fn execute() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = initialize_settings(&args)?;

    let spawner: Arc<dyn Spawner> = if args.dry_run {
        Arc::new(DryRunSpawner::new(settings.editor_command.clone()))
    } else {
        Arc::new(SystemSpawner)
    };

    let host = TerminalHost::new(
        args.file.clone(),
        args.project_folders.clone(),
        args.fallback_encoding.clone(),
    )
    .with_preselection(args.name_or_index.as_deref());

    let context = MainContext::new();
    let runner = ProcessRunner::new(spawner, context.scheduler());
    let mut picker = FolderPicker::new(settings, host, runner)?;

    picker.list();
    picker.run_until_idle(&context);

    if let Some(e) = picker.host_mut().take_selection_error() {
        return Err(e);
    }

    // Already shown to the user by the host
    if let Some(failure) = picker.take_fatal() {
        info!("Stopping after fatal failure: {failure}");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
