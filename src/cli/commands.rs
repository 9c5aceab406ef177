//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - chat: interactive query loop (the default)
//! - ask: answer a single query
//! - tools: list the tool catalogue
//! - dispatch: run tool extraction and execution on given text, offline

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reasoner - answers queries by pairing a language model with local tools
#[derive(Parser, Debug)]
#[command(name = "reasoner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for queries until `exit`
    Chat,

    /// Answer one query and exit
    Ask {
        /// The query to answer
        query: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available tools
    Tools,

    /// Extract and run a tool call from text without calling the model
    Dispatch {
        /// Text to search for a tool call
        text: String,

        /// Query the text answers (enables the known-word fallback)
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args means interactive mode
        let cli = Cli::try_parse_from(["reasoner"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["reasoner", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["reasoner", "-c", "/path/to/reasoner.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/reasoner.yml")));
    }

    #[test]
    fn test_chat() {
        let cli = Cli::try_parse_from(["reasoner", "chat"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Chat)));
    }

    #[test]
    fn test_ask() {
        let cli = Cli::try_parse_from(["reasoner", "ask", "Is 7 greater than 4?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { query, json }) => {
                assert_eq!(query, "Is 7 greater than 4?");
                assert!(!json);
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_ask_json() {
        let cli = Cli::try_parse_from(["reasoner", "ask", "--json", "q"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Ask { json: true, .. })));
    }

    #[test]
    fn test_ask_requires_query() {
        assert!(Cli::try_parse_from(["reasoner", "ask"]).is_err());
    }

    #[test]
    fn test_tools() {
        let cli = Cli::try_parse_from(["reasoner", "tools"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tools)));
    }

    #[test]
    fn test_dispatch_default_query() {
        let cli = Cli::try_parse_from(["reasoner", "dispatch", "count_words(\"a b\")"]).unwrap();
        match cli.command {
            Some(Commands::Dispatch { text, query }) => {
                assert_eq!(text, "count_words(\"a b\")");
                assert!(query.is_empty());
            }
            _ => panic!("Expected dispatch command"),
        }
    }

    #[test]
    fn test_dispatch_with_query() {
        let cli = Cli::try_parse_from([
            "reasoner",
            "dispatch",
            "'extraordinary'",
            "--query",
            "vowels in extraordinary?",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Dispatch { ref query, .. }) if query == "vowels in extraordinary?"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reasoner", "tools", "-v", "-c", "x.yml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["reasoner", "daemon"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
