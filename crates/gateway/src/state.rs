use std::sync::Arc;

use {
    herald_announcements::AnnouncementStore, herald_broadcast::Platform,
    herald_channels::ChannelAdmin,
};

/// Shared state for admin API handlers.
#[derive(Clone)]
pub struct AppState {
    pub channels: Arc<dyn ChannelAdmin>,
    pub announcements: Arc<dyn AnnouncementStore>,
    pub platform: Arc<dyn Platform>,
    pub version: &'static str,
}

impl AppState {
    pub fn new(
        channels: Arc<dyn ChannelAdmin>,
        announcements: Arc<dyn AnnouncementStore>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            channels,
            announcements,
            platform,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
