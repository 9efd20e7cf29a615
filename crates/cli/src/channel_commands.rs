use {
    anyhow::Result,
    clap::Subcommand,
    herald_channels::{ChannelAdmin, SqliteChannelStore, normalize_channel_identifier},
    herald_config::HeraldConfig,
    herald_telegram::TelegramPlatform,
};

use crate::db_commands::open_migrated;

#[derive(Subcommand)]
pub enum ChannelAction {
    /// List all registered channels.
    List,
    /// Register a channel. The bot must already be a member.
    Add {
        /// Channel id, short (`1234567890`) or full (`-1001234567890`).
        #[arg(allow_hyphen_values = true)]
        identifier: String,
        /// Display name used in reports.
        name: String,
        /// Who registered the channel.
        #[arg(long, default_value = "")]
        added_by: String,
    },
    /// Delete a channel.
    Remove {
        #[arg(allow_hyphen_values = true)]
        identifier: String,
    },
    /// Include a channel in broadcasts again.
    Activate {
        #[arg(allow_hyphen_values = true)]
        identifier: String,
    },
    /// Exclude a channel from broadcasts without deleting it.
    Deactivate {
        #[arg(allow_hyphen_values = true)]
        identifier: String,
    },
}

pub async fn handle_channels(action: ChannelAction, config: &HeraldConfig) -> Result<()> {
    let store = SqliteChannelStore::with_pool(open_migrated(config).await?);

    match action {
        ChannelAction::List => {
            let channels = store.list_all().await?;
            if channels.is_empty() {
                println!("No channels registered.");
            }
            for c in &channels {
                let state = if c.is_active { "active" } else { "inactive" };
                println!("  {:<16} {:<8} {}", c.channel_id, state, c.display_name);
            }
        },
        ChannelAction::Add {
            identifier,
            name,
            added_by,
        } => {
            let (bot, _) = herald_telegram::bot::connect(&config.telegram).await?;
            let platform = TelegramPlatform::new(bot);
            let channel = herald_gateway::registration::register_channel(
                &store,
                &platform,
                &identifier,
                &name,
                &added_by,
            )
            .await?;
            println!(
                "Registered '{}' ({})",
                channel.display_name, channel.channel_id
            );
        },
        ChannelAction::Remove { identifier } => {
            let id = normalize_channel_identifier(&identifier)?;
            store.remove(id).await?;
            println!("Removed channel {id}");
        },
        ChannelAction::Activate { identifier } => {
            let id = normalize_channel_identifier(&identifier)?;
            store.set_active(id, true).await?;
            println!("Activated channel {id}");
        },
        ChannelAction::Deactivate { identifier } => {
            let id = normalize_channel_identifier(&identifier)?;
            store.set_active(id, false).await?;
            println!("Deactivated channel {id}");
        },
    }

    Ok(())
}
