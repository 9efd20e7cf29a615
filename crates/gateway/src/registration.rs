use {
    herald_broadcast::Platform,
    herald_channels::{
        Channel, ChannelAdmin, NewChannel, normalize_channel_identifier,
    },
    tracing::info,
};

use crate::{Error, Result};

/// Register a destination channel from a user-supplied identifier.
///
/// The chat is resolved on the platform once; later dispatch passes
/// re-validate it independently.
pub async fn register_channel(
    channels: &dyn ChannelAdmin,
    platform: &dyn Platform,
    identifier: &str,
    display_name: &str,
    added_by: &str,
) -> Result<Channel> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(Error::bad_request("channel_name is required"));
    }

    let channel_id = normalize_channel_identifier(identifier)?;
    if let Err(e) = platform.get_chat(channel_id).await {
        return Err(Error::unreachable(identifier.trim(), e));
    }
    if channels.find_by_id(channel_id).await?.is_some() {
        return Err(herald_channels::Error::already_exists(channel_id).into());
    }

    let channel = channels
        .insert(NewChannel {
            channel_id,
            display_name: display_name.to_string(),
            added_by: added_by.to_string(),
        })
        .await?;
    info!(channel_id, channel = %channel.display_name, "channel registered");
    Ok(channel)
}
