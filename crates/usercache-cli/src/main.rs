//! usercache - command-line access to the user-management backend.
//!
//! Every command goes through the same data layer a UI would use, so reads
//! are cached and retried and writes invalidate what they touch.

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use usercache_core::models::{CreateUserRequest, UserStatus};
use usercache_core::{ApiClient, Config, DataLayer};

#[derive(Parser, Debug)]
#[command(name = "usercache")]
#[command(about = "Cached, retrying client for the user-management API", long_about = None)]
#[command(version)]
struct Cli {
    /// API base URL (default: `base_url` from the config file)
    #[arg(short, long, env = "USERCACHE_API_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List users
    List {
        /// Skip the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Show one user
    Get { id: i64 },
    /// Show user counts
    Stats {
        /// Skip the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Search users by text
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Create a user
    Create {
        name: String,
        email: String,
        phone: String,
    },
    /// Delete users one by one
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Change the status of users one by one
    SetStatus {
        /// `active` or `inactive`
        status: UserStatus,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(layer: &DataLayer<ApiClient>, command: Commands) -> Result<Value> {
    let users = layer.users();
    let value = match command {
        Commands::List { refresh } => serde_json::to_value(users.fetch_users(refresh).await?)?,
        Commands::Stats { refresh } => serde_json::to_value(users.fetch_stats(refresh).await?)?,
        Commands::Get { id } => serde_json::to_value(layer.user(id).fetch_user(false).await?)?,
        Commands::Search { query } => {
            serde_json::to_value(users.search_users(&query.join(" ")).await?)?
        }
        Commands::Create { name, email, phone } => {
            let request = CreateUserRequest { name, email, phone };
            serde_json::to_value(users.create_user(&request).await?)?
        }
        Commands::Delete { ids } => {
            serde_json::to_value(layer.batch().batch_delete_users(&ids).await)?
        }
        Commands::SetStatus { status, ids } => {
            serde_json::to_value(layer.batch().batch_update_user_status(&ids, status).await)?
        }
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load()?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    info!(base_url = %config.base_url, "Using API");

    let client = ApiClient::with_timeout(&config.base_url, config.request_timeout())?;
    let layer = DataLayer::with_settings(client, config.settings());

    let output = run(&layer, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Commands, clap::Error> {
        let argv = std::iter::once("usercache").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(|cli| cli.command)
    }

    #[test]
    fn test_parse_list_and_refresh() {
        assert_eq!(parse(&["list"]).unwrap(), Commands::List { refresh: false });
        assert_eq!(
            parse(&["stats", "--refresh"]).unwrap(),
            Commands::Stats { refresh: true }
        );
    }

    #[test]
    fn test_parse_batch_commands() {
        assert_eq!(
            parse(&["delete", "1", "2", "3"]).unwrap(),
            Commands::Delete { ids: vec![1, 2, 3] }
        );
        assert_eq!(
            parse(&["set-status", "inactive", "4"]).unwrap(),
            Commands::SetStatus {
                status: UserStatus::Inactive,
                ids: vec![4]
            }
        );
    }

    #[test]
    fn test_parse_search_words() {
        assert_eq!(
            parse(&["search", "ada", "lovelace"]).unwrap(),
            Commands::Search {
                query: vec!["ada".to_string(), "lovelace".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_create() {
        assert_eq!(
            parse(&["create", "Ada", "ada@example.com", "555-0100"]).unwrap(),
            Commands::Create {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
            }
        );
    }

    #[test]
    fn test_flags_do_not_leak_into_values() {
        // Unknown flags are rejected instead of becoming search text
        assert!(parse(&["search", "ada", "--refresh"]).is_err());
        assert!(parse(&["list", "--refesh"]).is_err());
        // Extra positionals are rejected instead of dropped
        assert!(parse(&["get", "1", "2"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["delete"]).is_err());
        assert!(parse(&["delete", "x"]).is_err());
        assert!(parse(&["set-status", "banned", "1"]).is_err());
        assert!(parse(&["set-status", "active"]).is_err());
        assert!(parse(&["create", "only-name"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
    }

    #[test]
    fn test_help_and_missing_command() {
        assert_eq!(
            parse(&["delete", "--help"]).unwrap_err().kind(),
            ErrorKind::DisplayHelp
        );
        // Bare invocation is an error, so the process exits non-zero
        let err = parse(&[]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::MissingSubcommand
        ));
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_url_flag() {
        let cli = Cli::try_parse_from(["usercache", "--url", "http://api.test", "list"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://api.test"));
    }
}
