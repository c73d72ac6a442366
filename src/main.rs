//! grain-lister: prints `<GrainType> <grainId>` for every persisted grain.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use grain_lister::{Args, AzureBlobLister, Config, GrainScanner, ListerResult, WriterSink};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging; stdout is reserved for records
    let log_level = if args.debug {
        Level::DEBUG
    } else if args.silent {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let pause = !args.no_pause;
    let result = run(&args).await;

    if let Err(ref e) = result {
        error!("Listing failed: {}", e);
        println!("{}", e);
    }

    if pause {
        wait_for_enter().await;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(args: &Args) -> ListerResult<()> {
    let config = Config::load(args)?;
    info!(
        container = %config.container_name,
        grain_types = config.registry.len(),
        "Listing grain state"
    );

    let lister = AzureBlobLister::from_connection_string(
        &config.connection_string,
        &config.container_name,
    )?
    .page_size(config.page_size);

    let scanner = GrainScanner::new(lister);
    scanner
        .scan(&config.registry, &mut WriterSink::stdout())
        .await?;

    Ok(())
}

/// Blocks until a line (or EOF) arrives on stdin.
async fn wait_for_enter() {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let mut line = String::new();
    let _ = BufReader::new(tokio::io::stdin()).read_line(&mut line).await;
}
