use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tripwise")]
#[command(about = "Plan a trip by talking to a research and itinerary pipeline", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/tripwise/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured app name
    #[arg(long, global = true)]
    pub app_name: Option<String>,

    /// Override the configured user id
    #[arg(long, global = true)]
    pub user_id: Option<String>,

    /// Override the configured session id
    #[arg(long, global = true)]
    pub session_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message and print the agent's answer
    Ask {
        /// The message, joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Chat with the planner interactively
    Console,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::parse_from(["tripwise", "ask", "Paris", "for", "3", "days"]);
        let Commands::Ask { query } = cli.command else { panic!("expected ask") };
        assert_eq!(query.join(" "), "Paris for 3 days");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from(["tripwise", "console", "--user-id", "alice", "--session-id", "7"]);
        assert!(matches!(cli.command, Commands::Console));
        assert_eq!(cli.user_id.as_deref(), Some("alice"));
        assert_eq!(cli.session_id.as_deref(), Some("7"));
        assert!(cli.app_name.is_none());
    }

    #[test]
    fn test_ask_requires_a_query() {
        assert!(Cli::try_parse_from(["tripwise", "ask"]).is_err());
    }
}
