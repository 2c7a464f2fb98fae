use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::steps::{CheckStepsArgs, run_check_steps};
use crate::validate::{ValidateArgs, run_validate};

#[derive(Debug, Parser)]
#[command(
    name = "fieldkit",
    about = "Validate form input against fieldkit definitions",
    version
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mount a form definition, apply inputs, and submit.
    Validate(ValidateArgs),

    /// Run inputs through a pipeline built from step specifiers.
    #[command(name = "check-steps")]
    CheckSteps(CheckStepsArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    crate::logging::init(cli.verbose);
    match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::CheckSteps(args) => run_check_steps(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validate_with_assignments() {
        let cli = Cli::try_parse_from([
            "fieldkit",
            "-vv",
            "validate",
            "--form",
            "form.json",
            "--set",
            "phone=0499123456",
            "--set",
            "note=a=b",
        ])
        .expect("valid arguments");
        assert_eq!(cli.verbose, 2);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(
            args.set,
            vec![
                ("phone".to_string(), "0499123456".to_string()),
                ("note".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_assignment_without_equals() {
        let err = Cli::try_parse_from(["fieldkit", "validate", "--form", "f.json", "--set", "phone"])
            .expect_err("missing '='");
        assert!(err.to_string().contains("name=value"));
    }

    #[test]
    fn parses_check_steps() {
        let cli = Cli::try_parse_from([
            "fieldkit",
            "check-steps",
            "required",
            "max-length:4",
            "--input",
            "abc",
            "--kind",
            "text",
        ])
        .expect("valid arguments");
        let Commands::CheckSteps(args) = cli.command else {
            panic!("expected check-steps");
        };
        assert_eq!(args.specs, ["required", "max-length:4"]);
        assert_eq!(args.input, ["abc"]);
    }
}
