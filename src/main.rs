// src/main.rs
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use menusnap::presenter::tag_colors::{paint_tag, DEFAULT_TAG_COLOR, TAG_COLORS};
use menusnap::processing::config::get_base_url;
use menusnap::{
    ImageRef, ProcessingConfig, ProcessingOrchestrator, RunOutcome, TerminalPresenter,
    UploadClient,
};

#[derive(Parser)]
#[command(name = "menusnap")]
#[command(about = "Snap a restaurant menu and see what every dish is", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a menu photo to the recognition service and show the dishes
    Process {
        /// Path to the menu photo
        image: PathBuf,

        /// Recognition service URL (default: $MENUSNAP_API_URL or http://localhost:8000)
        #[arg(long)]
        base_url: Option<String>,

        /// Print the results as JSON instead of a list
        #[arg(long)]
        json: bool,
    },
    /// Check that the recognition service answers
    CheckService {
        /// Recognition service URL (default: $MENUSNAP_API_URL or http://localhost:8000)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// List the dish tags and their colours
    Tags,
    /// Run simple interactive mode
    Interactive {
        /// Recognition service URL (default: $MENUSNAP_API_URL or http://localhost:8000)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info")
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Process { image, base_url, json } => {
            run_process(image, base_url, json).await
        }
        Commands::CheckService { base_url } => {
            check_service(base_url).await
        }
        Commands::Tags => {
            list_tags();
            Ok(())
        }
        Commands::Interactive { base_url } => {
            run_interactive_mode(base_url).await
        }
    }
}

async fn run_process(image: PathBuf, base_url: Option<String>, json: bool) -> Result<()> {
    let config = ProcessingConfig::from_args(base_url);
    info!("Processing menu photo {} via {}", image.display(), config.base_url);

    let image = match ImageRef::from_path(&image) {
        Ok(image) => Some(image),
        Err(e) => {
            error!("{}", e);
            None
        }
    };

    let mut orchestrator = ProcessingOrchestrator::from_config(
        &config,
        Arc::new(TerminalPresenter::new(json)),
    )?;

    match process_with_progress(&mut orchestrator, image, !json).await {
        RunOutcome::Navigated { .. } => Ok(()),
        RunOutcome::FellBack(_) => Err(anyhow!("The menu could not be processed")),
        RunOutcome::Cancelled => Err(anyhow!("Processing was cancelled")),
    }
}

/// One run with the loading screen drawn on stdout. Ctrl-C tears the run down.
async fn process_with_progress(
    orchestrator: &mut ProcessingOrchestrator,
    image: Option<ImageRef>,
    show_progress: bool,
) -> RunOutcome {
    let progress_view = show_progress.then(|| spawn_progress_view(orchestrator));

    let teardown = orchestrator.teardown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted; tearing down the loading screen");
            teardown.tear_down();
        }
    });

    let outcome = orchestrator.run(image).await;

    interrupt.abort();
    if let Some(view) = progress_view {
        view.abort();
    }
    outcome
}

fn spawn_progress_view(orchestrator: &ProcessingOrchestrator) -> JoinHandle<()> {
    let mut progress = orchestrator.subscribe();
    tokio::spawn(async move {
        let mut last_status = String::new();
        while progress.changed().await.is_ok() {
            let state = progress.borrow_and_update().clone();
            if state.status_text.is_empty() || state.status_text == last_status {
                continue;
            }
            last_status = state.status_text.clone();
            println!("[{:>3}%] {:<10} {}", state.percent, state.stage, state.status_text);
        }
    })
}

async fn check_service(base_url: Option<String>) -> Result<()> {
    let url = get_base_url(base_url);
    info!("Checking recognition service at {}...", url);

    let client = UploadClient::new(&url)?;
    match client.check_service().await {
        Ok(status) => {
            println!("✓ Recognition service is reachable at {} (HTTP {})", url, status.as_u16());
            println!("  Menu photos will be sent to {}", client.endpoint());
        }
        Err(e) => {
            println!("✗ Could not reach the recognition service at {}", url);
            println!("  Error: {}", e);
            println!("\nTroubleshooting:");
            println!("  1. Start the backend so that it serves POST /extract-dishes");
            println!("  2. Point menusnap at it with --base-url or MENUSNAP_API_URL");
        }
    }

    Ok(())
}

fn list_tags() {
    println!("\nDish tags:");
    for (tag, color) in TAG_COLORS {
        println!("  {}  {}", paint_tag(tag), color);
    }
    println!("  anything else uses {}", DEFAULT_TAG_COLOR);
    println!();
}

async fn run_interactive_mode(base_url: Option<String>) -> Result<()> {
    println!("🍜  MenuSnap Interactive Mode");
    println!("============================");
    println!();

    let config = ProcessingConfig::from_args(base_url);
    let mut orchestrator = ProcessingOrchestrator::from_config(
        &config,
        Arc::new(TerminalPresenter::new(false)),
    )?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Main menu loop
    loop {
        println!("\nMain Menu:");
        println!("1. Process a menu photo");
        println!("2. List dish tags");
        println!("3. Check recognition service");
        println!("4. Exit");
        let Some(choice) = prompt(&mut lines, "\nEnter your choice (1-4): ").await? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let label = "Path to the menu photo (leave empty to cancel): ";
                let Some(path) = prompt(&mut lines, label).await? else {
                    break;
                };
                if path.is_empty() {
                    continue;
                }

                let image = match ImageRef::from_path(&path) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        println!("✗ {}", e);
                        None
                    }
                };
                // Results and fallbacks both land back on this menu.
                let outcome = process_with_progress(&mut orchestrator, image, true).await;
                if outcome == RunOutcome::Cancelled {
                    println!("Exiting MenuSnap");
                    break;
                }
            }
            "2" => list_tags(),
            "3" => check_service(Some(config.base_url.clone())).await?,
            "4" => {
                println!("Exiting MenuSnap");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter a number between 1 and 4.");
            }
        }
    }

    Ok(())
}

async fn prompt<R>(lines: &mut tokio::io::Lines<R>, label: &str) -> Result<Option<String>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}
