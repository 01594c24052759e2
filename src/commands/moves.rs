use std::process::ExitCode;

use anyhow::Result;

use tower_operator::domain::services::MoveGenerator;
use tower_operator::domain::value_objects::DiscCount;

use super::CommandContext;

pub fn cmd_moves(ctx: &CommandContext, discs: i64) -> Result<ExitCode> {
    let count = DiscCount::with_limit(discs, ctx.config.validation.max_discs)?;
    let moves = MoveGenerator::solve(count);

    if ctx.json {
        println!("{}", serde_json::to_string(&moves)?);
    } else {
        for (i, mv) in moves.iter().enumerate() {
            println!("{:>4}. {}", i + 1, mv.describe());
        }
    }
    Ok(ExitCode::SUCCESS)
}
