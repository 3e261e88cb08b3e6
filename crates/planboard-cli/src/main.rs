//! Demo driver for the planboard subsystem.
//!
//! Plays the external collaborators' roles: an agent loop issuing JSON tool
//! calls, and a view observer folding the event stream into a rendered tree.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planboard_core::TaskSession;
use planboard_core::task::TaskStatus;
use planboard_core::view::TaskView;
use planboard_tool::TaskTool;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Planboard - session-scoped task tracking for autonomous agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session and render the live task tree after each event
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planboard=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo => demo().await,
    }
}

async fn demo() -> Result<()> {
    let session = TaskSession::new();
    let tool = TaskTool::for_session(&session);
    let mut events = session.subscribe().await;
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    // The observer side: fold every event into a local view and repaint.
    let observer_session = session.clone();
    let observer = tokio::spawn(async move {
        let mut view = TaskView::from_snapshot(observer_session.snapshot().await);
        loop {
            tokio::select! {
                // Drain pending events before honoring shutdown.
                biased;
                event = events.recv() => match event {
                    Ok(event) => {
                        view.apply(event);
                        render(&view);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "fell behind; resyncing from snapshot");
                        view.reset_to(observer_session.snapshot().await);
                        render(&view);
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = &mut shutdown_rx => break,
            }
        }
    });

    // The agent side: a scripted plan driven through the wire surface.
    let plan = tool
        .dispatch(json!({
            "action": "create",
            "tasks": [
                {"description": "ship the release"},
                {"description": "write tests", "parent": 0},
                {"description": "update changelog", "parent": 0},
            ],
        }))
        .await;
    let tests_id = plan["tasks"][1]["id"]
        .as_str()
        .context("create did not return the new plan")?
        .to_string();

    tool.dispatch(json!({
        "action": "update_status",
        "id": tests_id,
        "status": "in_progress",
    }))
    .await;
    tool.dispatch(json!({
        "action": "add",
        "description": "unit tests",
        "parent_id": tests_id,
    }))
    .await;
    tool.dispatch(json!({
        "action": "update_status",
        "id": tests_id,
        "status": "done",
    }))
    .await;

    // A rejected call: no state change, no event, just the failure envelope.
    let failure = tool
        .dispatch(json!({
            "action": "update_status",
            "id": "not-a-task",
            "status": "done",
        }))
        .await;
    println!("rejected call -> {failure}");

    // Let the observer drain what it has, then stop it.
    tokio::task::yield_now().await;
    let _ = shutdown_tx.send(());
    observer.await?;
    Ok(())
}

fn render(view: &TaskView) {
    println!("---");
    for row in view.rows() {
        let glyph = match row.task.status {
            TaskStatus::NotStarted => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Done => "[x]",
        };
        println!("{}{} {}", "  ".repeat(row.depth), glyph, row.task.description);
    }
}
