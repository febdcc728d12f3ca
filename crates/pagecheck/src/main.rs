use clap::Parser;
use pagecheck_engine::backend::Backend;
use pagecheck_engine::runner::{run_files, BatchReport, RunOptions};
use pagecheck_h::HeadlessBackend;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pagecheck",
    version,
    about = "Declarative UI assertion runner for rendered pages"
)]
struct Args {
    /// Script files to execute in order
    #[arg(required = true)]
    scripts: Vec<PathBuf>,

    /// Launch browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,

    /// Abort the batch at the first failing script
    #[arg(long)]
    stop_on_error: bool,

    /// Per-script timeout in seconds, as an operational safeguard
    #[arg(long)]
    timeout: Option<u64>,

    /// Emit the batch report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so stdout carries only reports
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut backend: Box<dyn Backend> =
        Box::new(HeadlessBackend::new_with_visibility(args.visible));
    if let Err(e) = backend.launch().await {
        eprintln!("Failed to launch backend: {}", e);
        return Err(e.into());
    }

    let options = RunOptions {
        stop_on_error: args.stop_on_error,
        timeout: args.timeout.map(Duration::from_secs),
    };
    let batch = run_files(&mut *backend, &args.scripts, &options).await;
    tracing::info!(
        passed = batch.passed(),
        failed = batch.failed(),
        "batch complete"
    );

    // The session is torn down whatever the scripts did.
    backend.close().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_report(&batch);
    }

    if !batch.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(batch: &BatchReport) {
    for script in &batch.scripts {
        if script.passed {
            println!("ok   {} ({:.2?})", script.name, script.duration);
        } else {
            println!("FAIL {} ({:.2?})", script.name, script.duration);
            if let Some(error) = &script.error {
                println!("     {}", error);
            }
        }
    }
    println!(
        "{} passed, {} failed ({} total) in {:.2?}",
        batch.passed(),
        batch.failed(),
        batch.total(),
        batch.duration
    );
}
