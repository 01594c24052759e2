use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tower-operator - declarative Tower of Hanoi convergence controller
#[derive(Parser, Debug)]
#[command(name = "tower-operator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events / JSON documents
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./tower-operator.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding challenge manifests
    #[arg(long, global = true)]
    pub manifests: Option<PathBuf>,

    /// Directory holding child records
    #[arg(long, global = true)]
    pub records: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the move sequence for a disc count
    Moves {
        /// Number of discs
        #[arg(allow_negative_numbers = true)]
        discs: i64,
    },

    /// Reconcile one challenge once (exit 0 = converged, 2 = retry, 1 = failed)
    Reconcile {
        /// Challenge name (manifest file stem)
        name: String,
    },

    /// Show the last written status of a challenge
    Status {
        /// Challenge name (manifest file stem)
        name: String,
    },

    /// Watch manifests and keep every challenge converged until Ctrl+C
    Run,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tower-operator",
            "reconcile",
            "demo",
            "--json",
            "-vv",
            "--records",
            "/tmp/r",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.records, Some(PathBuf::from("/tmp/r")));
        assert!(matches!(cli.command, Commands::Reconcile { ref name } if name == "demo"));
    }

    #[test]
    fn moves_accepts_negative_counts() {
        let cli = Cli::try_parse_from(["tower-operator", "moves", "-2"]).unwrap();
        assert!(matches!(cli.command, Commands::Moves { discs: -2 }));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["tower-operator"]).is_err());
    }
}
