use std::process::ExitCode;

use anyhow::{bail, Result};

use tower_operator::domain::ports::{ChallengeRepository, RepositoryError};

use super::context::parse_identity;
use super::CommandContext;

pub fn cmd_status(ctx: &CommandContext, name: &str) -> Result<ExitCode> {
    let identity = parse_identity(name)?;
    let challenge = match ctx.repository().get(&identity) {
        Ok(challenge) => challenge,
        Err(RepositoryError::NotFound(_)) => bail!("challenge '{}' not found", identity),
        Err(e) => return Err(e.into()),
    };
    let status = challenge.status;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}: {} (discs: {})", identity, status.phase, challenge.spec.discs);
    if let Some(started) = status.started_at {
        println!("  started:   {}", started.to_rfc3339());
    }
    if let Some(completed) = status.completed_at {
        println!("  completed: {}", completed.to_rfc3339());
    }
    if let Some(message) = &status.error_message {
        println!("  error:     {}", message);
    }
    if !status.steps.is_empty() {
        println!("  steps:");
        for (i, step) in status.steps.iter().enumerate() {
            match status.child_names.get(i) {
                Some(child) => println!("  {:>4}. {}  [{}]", i + 1, step, child),
                None => println!("  {:>4}. {}", i + 1, step),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
