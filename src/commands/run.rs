use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use tower_operator::application::{ControllerOptions, ControllerUseCase};

use super::CommandContext;

pub fn cmd_run(ctx: &CommandContext) -> Result<ExitCode> {
    let options = ControllerOptions::from_config(&ctx.config);
    let controller = ControllerUseCase::new(ctx.repository(), ctx.store(), options);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    if !ctx.json {
        eprintln!(
            "watching {} (Ctrl+C to stop)",
            ctx.manifests_dir().display()
        );
    }

    let summary = controller.start(running, ctx.event_sink())?;

    if !ctx.json {
        eprintln!(
            "stopped after {} attempts ({} converged, {} retried, {} failed)",
            summary.attempts,
            summary.successes,
            summary.retries_requested,
            summary.terminal_failures
        );
    }
    Ok(ExitCode::SUCCESS)
}
