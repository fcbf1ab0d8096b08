use chrono::{SubsecRound, Utc};
use clap::Parser;
use miette::{Context, Result};
use tracing::{info, warn};

use crate::{
    cli::CLIArgs,
    configuration::{
        configuration_manager,
        ensure_parent_directory_exists,
        get_default_configuration_file_path,
        Configuration,
    },
    logging::initialize_tracing,
};

mod cli;
mod configuration;
mod logging;


/// Prints every pending configuration error, newest first.
fn report_configuration_errors(manager: &mut konfig::Manager<Configuration>) {
    while let Some(error) = manager.get_err() {
        eprintln!("  - {error}");
    }
}


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    let configuration_file_path = match cli_args.configuration_file_path {
        Some(path) => path,
        None => get_default_configuration_file_path()
            .wrap_err("Could not determine default configuration file path.")?,
    };

    ensure_parent_directory_exists(&configuration_file_path)?;


    // Load configuration (this creates the file from defaults if it is missing).
    let mut configuration = Configuration::default();
    let mut manager = configuration_manager(&configuration_file_path);

    let configuration_is_clean = if cli_args.reset {
        println!("Resetting configuration: {}", configuration_file_path.display());
        manager.save(&mut configuration)
    } else {
        println!("Loading configuration: {}", configuration_file_path.display());
        manager.load(&mut configuration)
    }
    .wrap_err("Failed to process configuration file.")?;

    if !configuration_is_clean {
        eprintln!("Configuration loaded with errors:");
        report_configuration_errors(&mut manager);
    }

    let canonical_configuration_file_path = dunce::canonicalize(&configuration_file_path)
        .unwrap_or_else(|_| configuration_file_path.clone());
    println!(
        "Configuration loaded: {}.",
        canonical_configuration_file_path.display()
    );


    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        configuration.logging.log_file_output_level_filter(),
        &configuration.logging.log_file_output_directory,
        "konfig-demo.log",
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!("Tracing initialized.");
    info!(
        address = %configuration.server.address(),
        previous_run = %configuration.client.last_seen,
        "Configuration in effect."
    );


    // Apply command-line overrides and remember this run.
    if let Some(port) = cli_args.port {
        configuration.server.port = port;
    }
    if let Some(host) = cli_args.host {
        configuration.server.host = host;
    }
    configuration.client.last_seen = Utc::now().trunc_subsecs(0);

    let errors_before_save = manager.error_count();
    manager
        .save(&mut configuration)
        .wrap_err("Failed to save configuration file.")?;

    let new_errors = manager.errors().errors_since(errors_before_save);
    if new_errors.is_empty() {
        info!("Configuration saved.");
    } else {
        warn!(errors = new_errors.len(), "Configuration saved with errors.");
    }


    if cli_args.print {
        let document = manager
            .marshal(&mut configuration)
            .wrap_err("Failed to render configuration document.")?;
        print!("{document}");
    }


    drop(logging_raii_guard);
    Ok(())
}
