//! Semantic checks run before the bot starts.

use secrecy::ExposeSecret;

use crate::schema::HeraldConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "telegram.token"
    pub path: &'static str,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

pub fn validate(config: &HeraldConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let token = config.telegram.token.expose_secret();
    if token.trim().is_empty() {
        result.push(
            Severity::Error,
            "telegram.token",
            "bot token is not set (TELEGRAM_BOT_TOKEN)",
        );
    } else if !token.contains(':') {
        result.push(
            Severity::Warning,
            "telegram.token",
            "token does not look like a BotFather token (<id>:<secret>)",
        );
    }

    if config.telegram.admin_username.trim().trim_start_matches('@').is_empty() {
        result.push(
            Severity::Error,
            "telegram.admin_username",
            "administrator identity is not set (ADMIN_USERNAME)",
        );
    }

    if u64::from(config.telegram.poll_timeout_secs) >= config.telegram.request_timeout_secs {
        result.push(
            Severity::Warning,
            "telegram.request_timeout_secs",
            "should exceed poll_timeout_secs or long polls will be cut off",
        );
    }

    let b = &config.broadcast;
    if b.max_concurrency == 0 {
        result.push(
            Severity::Error,
            "broadcast.max_concurrency",
            "must be at least 1",
        );
    }
    if b.destination_timeout_secs == 0 {
        result.push(
            Severity::Error,
            "broadcast.destination_timeout_secs",
            "must be at least 1",
        );
    }
    if b.pass_deadline_secs < b.destination_timeout_secs {
        result.push(
            Severity::Warning,
            "broadcast.pass_deadline_secs",
            "is shorter than destination_timeout_secs; slow destinations will always time out",
        );
    }

    if config.database.url.trim().is_empty() {
        result.push(Severity::Error, "database.url", "must not be empty");
    }

    result
}
