use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "benchbot")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to YAML config file
    #[arg(short, long, env = "BENCHBOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a wrk report and print the extracted results
    #[command(arg_required_else_help = true)]
    Parse {
        /// wrk output file, `-` for stdin
        report: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Fail when nothing in the report is recognised
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Render the pull request comment for a run
    #[command(arg_required_else_help = true)]
    Compare {
        /// wrk output of the pull request build, `-` for stdin
        head: PathBuf,

        /// wrk output of the base branch build
        #[arg(short, long)]
        base: Option<PathBuf>,
    },
    /// Decide whether a webhook payload should start a benchmark
    #[command(arg_required_else_help = true)]
    Trigger {
        /// Webhook JSON body, `-` for stdin
        payload: PathBuf,

        /// Value of the X-GitHub-Event header
        #[arg(short, long, default_value = "issue_comment")]
        event: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compare_with_base() {
        let args = Args::try_parse_from([
            "benchbot",
            "--config",
            "bot.yaml",
            "compare",
            "head.txt",
            "--base",
            "base.txt",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("bot.yaml")));
        match args.command {
            Commands::Compare { head, base } => {
                assert_eq!(head, PathBuf::from("head.txt"));
                assert_eq!(base, Some(PathBuf::from("base.txt")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_defaults_to_json() {
        let args = Args::try_parse_from(["benchbot", "parse", "-"]).unwrap();
        match args.command {
            Commands::Parse {
                report,
                format,
                strict,
            } => {
                assert_eq!(report, PathBuf::from("-"));
                assert_eq!(format, OutputFormat::Json);
                assert!(!strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn trigger_event_default() {
        let args = Args::try_parse_from(["benchbot", "trigger", "payload.json"]).unwrap();
        match args.command {
            Commands::Trigger { event, .. } => assert_eq!(event, "issue_comment"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
