//! Subcommand implementations

mod context;
mod moves;
mod reconcile;
mod run;
mod status;

pub use context::CommandContext;
pub use moves::cmd_moves;
pub use reconcile::cmd_reconcile;
pub use run::cmd_run;
pub use status::cmd_status;
