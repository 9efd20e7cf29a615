use {
    anyhow::Result,
    clap::Subcommand,
    herald_announcements::{AnnouncementStore, SqliteAnnouncementStore},
    herald_config::HeraldConfig,
};

use crate::db_commands::open_migrated;

#[derive(Subcommand)]
pub enum AnnouncementAction {
    /// Show the most recent announcements, newest first.
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

pub async fn handle_announcements(action: AnnouncementAction, config: &HeraldConfig) -> Result<()> {
    let store = SqliteAnnouncementStore::with_pool(open_migrated(config).await?);

    match action {
        AnnouncementAction::List { limit } => {
            let announcements = store.list_recent(limit).await?;
            if announcements.is_empty() {
                println!("No announcements yet.");
            }
            for a in &announcements {
                let state = if a.is_published {
                    "published"
                } else {
                    "pending"
                };
                println!(
                    "  #{:<6} {:<10} {:<16} {}",
                    a.id,
                    state,
                    a.posted_by,
                    first_line(&a.text)
                );
            }
        },
    }

    Ok(())
}

/// First line of `text`, cut to 60 characters.
fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > 60 {
        let cut: String = line.chars().take(59).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
