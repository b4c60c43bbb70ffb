use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "repurposer",
    version,
    about = "Turn one short brief into LinkedIn, Instagram and Email content"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the full generation pipeline (the default command)
    Run {
        #[arg(long, help = "Brief text; prompts interactively when omitted")]
        brief: Option<String>,
        #[arg(long, help = "Results CSV path (overrides REPURPOSER_RESULTS_CSV)")]
        results: Option<PathBuf>,
        #[arg(long, help = "Skip appending a row to the results CSV")]
        no_save: bool,
        #[arg(long, help = "Print the full run state as JSON instead of the text report")]
        json: bool,
    },
    /// Score existing content with the quality heuristics (JSON output)
    Score {
        #[arg(long)]
        platform: String,
        #[arg(long, help = "Read content from a file instead of stdin")]
        file: Option<PathBuf>,
    },
    /// Apply platform formatting rules to existing content (JSON output)
    Format {
        #[arg(long)]
        platform: String,
        #[arg(long = "hashtag", help = "Hashtag for Instagram; repeatable")]
        hashtags: Vec<String>,
        #[arg(long, help = "Read content from a file instead of stdin")]
        file: Option<PathBuf>,
    },
    /// Summarize the scores recorded in the results CSV
    Summary {
        #[arg(long)]
        results: Option<PathBuf>,
    },
}

impl Cli {
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Run {
            brief: None,
            results: None,
            no_save: false,
            json: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_interactive_run() {
        let cli = Cli::try_parse_from(["repurposer"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Run {
                brief: None,
                results: None,
                no_save: false,
                json: false
            }
        );
    }

    #[test]
    fn test_format_collects_repeated_hashtags() {
        let cli = Cli::try_parse_from([
            "repurposer",
            "format",
            "--platform",
            "instagram",
            "--hashtag",
            "growth",
            "--hashtag",
            "#Mindset",
        ])
        .unwrap();
        match cli.command_or_default() {
            Commands::Format {
                platform, hashtags, ..
            } => {
                assert_eq!(platform, "instagram");
                assert_eq!(hashtags, vec!["growth", "#Mindset"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "repurposer",
            "run",
            "--brief",
            "Tips for remote teams",
            "--no-save",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Run {
                brief: Some("Tips for remote teams".to_string()),
                results: None,
                no_save: true,
                json: true
            }
        );
    }

    #[test]
    fn test_score_requires_platform() {
        assert!(Cli::try_parse_from(["repurposer", "score"]).is_err());
    }
}
