//! Assignment Collector - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use assignment_collector::{
    cli::{gather_answers, Args},
    collect::Collector,
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    fs::ensure_dir,
    header::detect_stamper,
    output::{
        create_spinner, print_banner, print_collect_stats, print_error, print_info,
        print_run_summary, print_success,
    },
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::SourceNotFound(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Prompt(_) => ExitCode::from(exit_codes::ABORT as u8),
                Error::Copy { .. } | Error::Io(_) | Error::Walk(_) => {
                    ExitCode::from(exit_codes::COPY_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let (mut config, config_path) = Config::discover(args.config.as_deref())?;
    match &config_path {
        Some(path) => print_info(&format!("Using configuration from {}", path.display())),
        None => tracing::debug!("No configuration file found, using defaults"),
    }

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let stamper = detect_stamper(config.header.font_size_pt);

    let answers = gather_answers(&args, &config, stamper.is_some())?;
    ensure_dir(&answers.output)?;
    print_run_summary(&answers);

    let output = answers.output.clone();
    let mut collector = Collector::new(answers.into_options());
    if let Some(stamper) = stamper.as_deref() {
        collector = collector.with_stamper(stamper);
    }

    let spinner = create_spinner("Copying files...");
    let result = collector.run();
    spinner.finish_and_clear();
    let stats = result?;

    print_collect_stats(&stats);
    print_success(&format!("Output folder: {}", output.display()));

    Ok(())
}
