use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, HttpRecommendationService, Phase, RecommendationService, SessionController,
};
use shared::domain::PRESET_PROMPTS;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "moodtunes", about = "Discover a playlist that matches your mood")]
struct Args {
    /// Describe the mood and exit once the playlist is shown.
    #[arg(long, conflicts_with = "preset")]
    prompt: Option<String>,
    /// Submit one of the built-in example searches.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    preset: Option<u8>,
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    min_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.service_url {
        settings.service_url = url;
    }
    if let Some(ms) = args.min_delay_ms {
        settings.min_loading_delay_ms = ms;
    }
    tracing::debug!(service_url = %settings.service_url, "settings loaded");

    let service = HttpRecommendationService::new(&settings)
        .context("failed to build recommendation client")?;
    let mut controller = SessionController::new(service, settings.min_loading_delay());

    let prompt = args.prompt.or_else(|| {
        args.preset
            .map(|n| PRESET_PROMPTS[usize::from(n) - 1].to_string())
    });

    match prompt {
        Some(prompt) => run_once(&mut controller, &prompt).await,
        None => {
            run_interactive(&mut controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_once<S: RecommendationService + 'static>(
    controller: &mut SessionController<S>,
    prompt: &str,
) -> Result<ExitCode> {
    if !controller.submit(prompt) {
        eprintln!("Describe your music mood to get a playlist.");
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", render::screen(controller.session()));
    let mut last = controller.phase();
    while last.is_in_flight() {
        let phase = controller.next_event().await;
        if phase != last {
            println!("{}", render::screen(controller.session()));
            last = phase;
        }
    }

    Ok(if last == Phase::Ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_interactive<S: RecommendationService + 'static>(
    controller: &mut SessionController<S>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render::screen(controller.session()));
    let mut last = controller.phase();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                if !handle_line(controller, &line) {
                    break;
                }
            }
            phase = controller.next_event(), if controller.phase().is_in_flight() => {
                if phase != last {
                    println!("{}", render::screen(controller.session()));
                }
            }
        }
        last = controller.phase();
    }

    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_line<S: RecommendationService + 'static>(
    controller: &mut SessionController<S>,
    line: &str,
) -> bool {
    let trimmed = line.trim();
    match trimmed {
        "" => {}
        ":quit" | ":q" => return false,
        ":reset" => {
            controller.reset();
            println!("{}", render::screen(controller.session()));
        }
        ":presets" => print!("{}", render::presets()),
        ":help" => println!("{}", render::HOW_IT_WORKS),
        _ => {
            let prompt = match trimmed.strip_prefix(":preset ") {
                Some(n) => match n.trim().parse::<usize>() {
                    Ok(n) if (1..=PRESET_PROMPTS.len()).contains(&n) => PRESET_PROMPTS[n - 1],
                    _ => {
                        println!("Unknown preset; see :presets");
                        return true;
                    }
                },
                None => line,
            };

            if controller.phase().is_in_flight() {
                println!("Still working on your playlist; :reset to start over");
                return true;
            }

            if controller.submit(prompt) {
                println!("{}", render::screen(controller.session()));
            }
        }
    }
    true
}
