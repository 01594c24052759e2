use std::process::ExitCode;

use anyhow::Result;

use tower_operator::application::{ReconcileOptions, ReconcileUseCase};

use super::context::parse_identity;
use super::CommandContext;

pub fn cmd_reconcile(ctx: &CommandContext, name: &str) -> Result<ExitCode> {
    let identity = parse_identity(name)?;
    let use_case = ReconcileUseCase::new(ctx.repository(), ctx.store());
    let options = ReconcileOptions::from_config(&ctx.config);

    let report = use_case.reconcile_with_events(&identity, &options, ctx.event_sink());

    if !ctx.json {
        if report.parent_missing {
            println!("{}: not found", identity);
        } else {
            let phase = report
                .status
                .as_ref()
                .map(|s| s.phase)
                .unwrap_or_else(|| report.final_phase());
            match report.outcome.reason() {
                Some(reason) => println!("{}: {} ({})", identity, phase, reason),
                None => println!(
                    "{}: {} ({} changes)",
                    identity,
                    phase,
                    report.mutation_count()
                ),
            }
        }
    }

    // Exit codes are 0, 1 or 2
    Ok(ExitCode::from(report.outcome.exit_code() as u8))
}
