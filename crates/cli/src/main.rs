//! YelpCamp CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! yc-cli migrate
//!
//! # Create a user
//! yc-cli user create -u colt -e colt@example.com -p 'correct horse battery'
//!
//! # Replace all campgrounds with 200 generated ones
//! yc-cli seed campgrounds --author colt
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user account
//! - `seed campgrounds` - Seed the database with demo campgrounds

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use yelpcamp_web::seeds::DEFAULT_SEED_COUNT;

mod commands;

#[derive(Parser)]
#[command(name = "yc-cli")]
#[command(author, version, about = "YelpCamp CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database with demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Sign-in handle
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "YC_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Delete every campground and insert generated ones
    Campgrounds {
        /// Username that will own the seeded campgrounds
        #[arg(short, long)]
        author: String,

        /// Number of campgrounds to create
        #[arg(short, long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
            } => commands::user::create(&username, &email, &password).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Campgrounds { author, count } => {
                commands::seed::campgrounds(&author, count).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_count_defaults_to_200() {
        let cli = Cli::parse_from(["yc-cli", "seed", "campgrounds", "--author", "colt"]);
        let Commands::Seed {
            target: SeedTarget::Campgrounds { author, count },
        } = cli.command
        else {
            panic!("expected seed campgrounds");
        };
        assert_eq!(author, "colt");
        assert_eq!(count, 200);
    }
}
