use crate::{Error, Result};

/// Prefix Telegram uses for channel and supergroup ids.
pub const CHANNEL_ID_PREFIX: &str = "-100";

/// Map a user-supplied channel identifier into the platform's full id space.
///
/// Accepts the short numeric form shown in channel links (`1234567890`) and
/// the already-qualified form (`-1001234567890`).
pub fn normalize_channel_identifier(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_identifier("identifier is empty"));
    }

    let digits = trimmed.strip_prefix(CHANNEL_ID_PREFIX).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_identifier(format!(
            "{trimmed:?} is not a numeric channel id"
        )));
    }

    format!("{CHANNEL_ID_PREFIX}{digits}")
        .parse::<i64>()
        .map_err(|e| Error::invalid_identifier(format!("{trimmed:?}: {e}")))
}
