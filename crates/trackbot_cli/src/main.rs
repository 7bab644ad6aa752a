//! Command-line entry point for trackbot storage maintenance.
//!
//! # Responsibility
//! - Run one gateway operation per invocation against the configured store.
//! - Serve as the periodic trigger for expired-user and orphan cleanup.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::info;
use trackbot_core::{
    init_logging, open_session, PersistenceGateway, ProductId, StoreConfig, UserCreation, UserId,
};

#[derive(Debug, Parser)]
#[command(name = "trackbot", version, about = "Manage trackbot users and trackings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a user with a subscription of DAYS days from today.
    AddUser { user_id: UserId, days: u32 },
    /// Print one user.
    ShowUser { user_id: UserId },
    /// Delete a user; their trackings are kept.
    DeleteUser { user_id: UserId },
    /// Print all users by id.
    ListUsers,
    /// Record a tracking request.
    AddTracking {
        user_id: UserId,
        product_id: ProductId,
        count: i64,
    },
    /// Print all trackings by user id.
    ListTrackings,
    /// Delete users whose subscription ended before today.
    PurgeExpired,
    /// Delete trackings whose user no longer exists.
    PurgeOrphans,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = StoreConfig::from_env().context("failed to read configuration")?;
    init_logging(&config.logging).map_err(|err| anyhow!(err))?;

    let session = open_session(&config)
        .await
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let gateway = PersistenceGateway::new();
    info!("event=cli_command module=cli status=start command={:?}", cli.command);

    match cli.command {
        Command::AddUser { user_id, days } => {
            match gateway.register_user(&session, user_id, days).await? {
                UserCreation::Created(user) => {
                    println!("created user {} subscribed until {}", user.id, user.subscribe)
                }
                UserCreation::AlreadyExists => println!("user {user_id} already exists"),
                UserCreation::StoreUnavailable => println!("store unavailable, user not created"),
            }
        }
        Command::ShowUser { user_id } => match gateway.get_user(&session, user_id).await? {
            Some(user) => println!("{}\t{}", user.id, user.subscribe),
            None => println!("user {user_id} not found"),
        },
        Command::DeleteUser { user_id } => {
            let deleted = gateway.delete_user(&session, user_id).await?;
            println!("deleted={deleted}");
        }
        Command::ListUsers => {
            for user in gateway.list_users(&session).await? {
                println!("{}\t{}", user.id, user.subscribe);
            }
        }
        Command::AddTracking {
            user_id,
            product_id,
            count,
        } => {
            let created = gateway
                .create_tracking(&session, product_id, count, user_id)
                .await?;
            println!("created={created}");
        }
        Command::ListTrackings => {
            for tracking in gateway.list_trackings(&session).await? {
                println!(
                    "{}\t{}\t{}",
                    tracking.user_id, tracking.product_id, tracking.count
                );
            }
        }
        Command::PurgeExpired => {
            gateway.purge_expired_users(&session).await?;
            println!("expired users purged");
        }
        Command::PurgeOrphans => {
            let removed = gateway.purge_orphaned_trackings(&session).await?;
            println!("removed={removed}");
        }
    }

    session.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_add_tracking_arguments_in_order() {
        let cli = Cli::try_parse_from(["trackbot", "add-tracking", "12234", "55", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::AddTracking {
                user_id: 12234,
                product_id: 55,
                count: 2
            }
        ));
    }

    #[test]
    fn rejects_negative_subscription_days() {
        assert!(Cli::try_parse_from(["trackbot", "add-user", "1", "-3"]).is_err());
    }
}
