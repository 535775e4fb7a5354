use anyhow::Result;
use clap::Parser;
use lofi_batch::animate::run_animate;
use lofi_batch::batch::run_batch;
use lofi_batch::cli::{Cli, Commands};
use lofi_batch::config::Settings;
use lofi_batch::durations::summarize_folder;
use lofi_batch::init;
use lofi_batch::platform;
use lofi_batch::probe::FfprobeProbe;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load_or_default(cli.config.as_deref()).await?;

    match &cli.command {
        Commands::Batch(args) => {
            if let Some(jobs) = args.jobs {
                settings.jobs = jobs;
            }
            settings.validate()?;

            let options = args.options();
            let report = run_batch(&options, &settings).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report.plan)?);
            }
            if args.open && !options.dry_run {
                platform::open_folder(&options.output_folder);
            }
        }
        Commands::Durations { folder } => {
            init::require_folder(folder)?;
            let probe = FfprobeProbe::new(settings.ffprobe.clone());
            let report = summarize_folder(&probe, folder).await?;
            if report.entries.is_empty() {
                println!("No audio files found in {}", folder.display());
            } else {
                println!("Analyzing folder: {}", folder.display());
                print!("{}", report.render_table());
            }
        }
        Commands::Animate(args) => {
            run_animate(&args.options(), &settings).await?;
        }
    }

    Ok(())
}
