mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tokio::sync::broadcast;
use vidscribe::{read_sources, Pipeline, RunReport};
use vs_av::ToolRegistry;
use vs_core::config::Config;
use vs_core::events::{Event, EventBus, EventPayload};
use vs_pipeline::Collaborators;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG_FILE: &str = "vidscribe.json";

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidscribe=debug,vs_pipeline=debug,vs_av=debug,vs_text=debug,vs_core=debug".to_string()
        } else {
            "vidscribe=info,vs_pipeline=info,vs_av=warn,vs_text=warn,vs_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref().map(expand);

    match cli.command {
        Commands::Run {
            sources,
            stages,
            backend,
            data_dir,
            report,
        } => {
            let mut config = load_config(config_path.as_deref())?;
            if !stages.is_empty() {
                config.stages.restrict_to(&stages);
            }
            if let Some(backend) = backend {
                config.execution.backend = backend;
            }
            if let Some(dir) = data_dir {
                config.output.data_dir = expand(&dir);
            }
            if let Some(path) = report {
                config.output.report_file = Some(expand(&path));
            }

            let runtime = build_runtime(&config)?;
            runtime.block_on(run_pipeline(config, &expand(&sources)))
        }
        Commands::CheckTools => {
            let config = load_config(config_path.as_deref())?;
            check_tools(&config)
        }
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.map(|p| expand(&p)).or(config_path);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidscribe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load(p)?,
        None => Config::load_or_default(Some(Path::new(DEFAULT_CONFIG_FILE))),
    };
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

fn build_runtime(config: &Config) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = config.execution.worker_threads.filter(|&n| n > 0) {
        builder.worker_threads(threads);
    }
    builder.build().context("failed to start the async runtime")
}

async fn run_pipeline(config: Config, sources_path: &Path) -> Result<()> {
    let sources = read_sources(sources_path).await?;
    if sources.is_empty() {
        tracing::warn!("No sources found in {}", sources_path.display());
    }

    let tools = ToolRegistry::discover(&config.tools);
    let collaborators = Collaborators::from_config(&config, &tools);
    let events = Arc::new(EventBus::default());
    let progress = tokio::spawn(report_progress(events.subscribe()));
    let pipeline = Pipeline::new(config, collaborators).with_events(Arc::clone(&events));

    let result = pipeline.run(sources).await;
    // Dropping the last bus handle closes the channel and ends the display.
    drop(pipeline);
    drop(events);
    if let Err(e) = progress.await {
        tracing::debug!("Progress display stopped: {e}");
    }

    let report = result?;
    print_summary(&report);
    Ok(())
}

/// Print one stderr line per finished item until the bus closes.
async fn report_progress(mut rx: broadcast::Receiver<Event>) {
    let (mut total, mut done, mut failed) = (0usize, 0usize, 0usize);
    loop {
        let payload = match rx.recv().await {
            Ok(event) => event.payload,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Progress display skipped {skipped} events");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let stage = match payload {
            EventPayload::StageStarted { items, .. } => {
                (total, done, failed) = (items, 0, 0);
                continue;
            }
            EventPayload::ItemSucceeded { stage, .. } => stage,
            EventPayload::ItemFailed { stage, .. } => {
                failed += 1;
                stage
            }
            _ => continue,
        };
        done += 1;
        eprintln!("[{stage}] {done}/{total} done, {failed} failed");
    }
}

fn print_summary(report: &RunReport) {
    println!("Run {} ({} items)", report.run_id, report.items.len());
    for stage in &report.stages {
        println!(
            "  {:<11} {:>3} ok {:>3} failed  {:>8.2}s  (cap {}, peak {})",
            stage.stage.as_str(),
            stage.succeeded,
            stage.failure_count(),
            stage.elapsed().as_secs_f64(),
            stage.concurrency,
            stage.high_water
        );
        for failure in &stage.failures {
            println!("      ✗ {}: {}", failure.source, failure.message);
        }
    }
    println!("Total failures: {}", report.total_failures());
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all stages.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Data dir: {}", config.output.data_dir.display());
    println!("  Backend: {:?}", config.execution.backend);
    for kind in config.stages.enabled() {
        let stage = config.stages.get(kind);
        let cap = stage
            .concurrency
            .map_or_else(|| "batch size".to_string(), |c| c.to_string());
        println!("  Stage {kind}: concurrency {cap}");
    }

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
