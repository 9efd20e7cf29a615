//! User-facing reply texts.

use crate::dispatcher::DispatchSummary;

pub const UNAUTHORIZED: &str = "Sorry, you are not authorized to send announcements.";
pub const EMPTY_TEXT: &str = "Please provide a non-empty message for the announcement.";
pub const STORE_FAILED: &str = "Error storing your announcement. Please try again.";
pub const REGISTRY_FAILED: &str = "Error fetching channels. Please try again.";
pub const NO_DESTINATIONS: &str = "No active channels found. Please add some channels first.";

const FAILED_HEADER: &str = "\nFailed to send to the following channels:\n";
const FAILED_HINT: &str = "\nPlease make sure the bot is an admin in these channels and has permission to post messages.";

/// Render the completion report sent back to the originator.
#[must_use]
pub fn summary_text(summary: &DispatchSummary) -> String {
    let mut out = format!(
        "Your announcement has been sent to {} out of {} channels.\n",
        summary.success_count, summary.total_considered
    );
    if summary.failures.is_empty() {
        return out;
    }
    out.push_str(FAILED_HEADER);
    for name in summary.failed_channel_names() {
        out.push_str(&format!("- {name}\n"));
    }
    out.push_str(FAILED_HINT);
    out
}
