//! Main Entrypoint for the Claimlens Console
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and CLI flags.
//! 2. Initializing logging.
//! 3. Resolving the durable session identity.
//! 4. Opening the WebSocket channel to the analysis pipeline.
//! 5. Running the interactive event loop until EOF or channel closure.

use anyhow::Context;
use claimlens_console::{
    config::Config,
    connection::Connection,
    identity, render,
};
use claimlens_core::{SessionController, cards::CardRegistry};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "claimlens", about = "Terminal client for the claimlens analysis pipeline")]
struct Cli {
    /// Pipeline host (overrides SERVER_HOST).
    #[arg(long)]
    host: Option<String>,
    /// Pipeline WebSocket port (overrides SERVER_PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(cli.host, cli.port);

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let session_id = identity::get_or_create(&config.state_dir);
    info!(%session_id, "session identity resolved");

    let mut connection = Connection::open(&config.server_host, config.server_port, &session_id)
        .await
        .with_context(|| {
            format!(
                "Failed to open channel to {}:{}",
                config.server_host, config.server_port
            )
        })?;

    println!("{}", "claimlens: misinformation analysis console".bold());
    println!("{}", "Type a statement to investigate, Ctrl-D to quit.".dimmed());

    let mut controller = SessionController::new(CardRegistry::for_pipeline());
    let mut input_lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = input_lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    info!("stdin closed, shutting down");
                    break;
                };
                // After the final report, input goes to the follow-up
                // conversation instead of starting a new investigation.
                let outbound = if controller.followup.is_active() {
                    let msg = controller.submit_followup(&line);
                    if msg.is_some() {
                        if let Some(turn) = controller.followup.turns().last() {
                            println!("{}", render::followup_turn(turn));
                        }
                    }
                    msg
                } else {
                    let msg = controller.submit_question(&line);
                    if msg.is_some() {
                        if let Some(echoed) = controller.transcript.lines().last() {
                            println!("{}", render::transcript_line(echoed));
                        }
                    }
                    msg
                };
                if let Some(msg) = outbound {
                    connection.send(&msg).await.context("Failed to send message")?;
                }
            },
            frame = connection.next_text() => {
                let Some(raw) = frame else {
                    info!("channel closed by the pipeline");
                    break;
                };
                let events = controller.dispatch(&raw);
                let rendered = render::apply(&controller, &events);
                if !rendered.is_empty() {
                    print!("{rendered}");
                }
            },
        }
    }

    info!("session ended");
    Ok(())
}
