//! VidGen binary: prompt-to-video CLI.

use std::io::Write as _;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vidgen_pipeline::{Orchestrator, PipelineConfig, PipelineError};

#[derive(Parser, Debug)]
#[command(name = "vidgen")]
#[command(about = "AI video generator - text to video", long_about = None)]
struct Args {
    /// Video description; prompts interactively when omitted.
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();
    print_banner();

    let args = Args::parse();
    let prompt = if args.prompt.is_empty() {
        match prompt_from_user() {
            Some(prompt) => prompt,
            None => return 0,
        }
    } else {
        let prompt = args.prompt.join(" ");
        println!("Prompt: \"{prompt}\"\n");
        prompt
    };

    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            print_failure(&e);
            return 1;
        }
    };
    let orchestrator = match Orchestrator::from_config(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            print_failure(&e);
            return 1;
        }
    };

    tokio::select! {
        result = orchestrator.run(&prompt) => match result {
            Ok(video) => {
                println!();
                println!("============================================================");
                println!("SUCCESS! Video ready: {}", video.display());
                println!("============================================================");
                println!();
                0
            }
            Err(e) => {
                error!("video generation failed: {e}");
                print_failure(&e);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nCancelled by user.");
            1
        }
    }
}

/// Initialize tracing with colored output for dev, JSON for production.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vidgen_pipeline=info".parse().expect("valid directive"))
        .add_directive("vidgen_media=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn print_banner() {
    println!();
    println!("============================================================");
    println!(r"  __     ___     _  ____            ");
    println!(r"  \ \   / (_) __| |/ ___| ___ _ __  ");
    println!(r"   \ \ / /| |/ _` | |  _ / _ \ '_ \ ");
    println!(r"    \ V / | | (_| | |_| |  __/ | | |");
    println!(r"     \_/  |_|\__,_|\____|\___|_| |_|");
    println!();
    println!("  AI Video Generator - Text to Video");
    println!("============================================================");
    println!();
}

/// Interactively read a prompt, with confirmation and a quit escape.
///
/// Returns `None` when the user quits or stdin closes.
fn prompt_from_user() -> Option<String> {
    println!("Enter a description of the video you want to create:");
    println!("  Examples: 'A knight fights a dragon', 'A cat playing with yarn'");
    println!();

    loop {
        print!("Prompt: ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }

        let prompt = line.trim().to_string();
        if prompt.is_empty() {
            println!("Please enter a prompt (or 'quit' to exit)");
            continue;
        }
        if matches!(prompt.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            return None;
        }

        println!("\nGenerating: \"{prompt}\"");
        print!("Continue? (y/n): ");
        std::io::stdout().flush().ok();

        let mut confirm = String::new();
        if std::io::stdin().read_line(&mut confirm).is_err() {
            return None;
        }
        match confirm.trim().to_lowercase().as_str() {
            "y" | "yes" | "" => return Some(prompt),
            _ => println!(),
        }
    }
}

fn print_failure(e: &PipelineError) {
    println!();
    println!("============================================================");
    println!("ERROR: {e}");
    println!("============================================================");
    println!();
    println!("Troubleshooting:");
    println!("  - Check API keys in .env (ANTHROPIC_API_KEY, REPLICATE_API_TOKEN)");
    println!("  - Verify internet connection");
    println!("  - Ensure your Replicate account has credit");
    println!();
}
