use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{Error, Result, schema::HeraldConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["herald.toml", "herald.yaml", "herald.yml", "herald.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<HeraldConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw, |name| std::env::var(name).ok());
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply env overrides.
///
/// Search order:
/// 1. `./herald.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/herald/herald.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `HeraldConfig::default()` when nothing is found or the file
/// fails to parse.
pub fn discover_and_load() -> HeraldConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                HeraldConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            HeraldConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/herald/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "herald").map(|d| d.config_dir().to_path_buf())
}

/// Override config values from the process environment.
///
/// Recognised variables: `TELEGRAM_BOT_TOKEN`, `ADMIN_USERNAME`, `WEB_PORT`,
/// `HERALD_BIND`, `HERALD_DATABASE_URL`. Empty values are ignored.
pub fn apply_env_overrides(config: &mut HeraldConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
        config.telegram.token = Secret::new(token);
    }
    if let Some(admin) = get("ADMIN_USERNAME") {
        config.telegram.admin_username = admin;
    }
    if let Some(port) = get("WEB_PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(value = %port, error = %e, "ignoring invalid WEB_PORT"),
        }
    }
    if let Some(bind) = get("HERALD_BIND") {
        config.server.bind = bind;
    }
    if let Some(url) = get("HERALD_DATABASE_URL") {
        config.database.url = url;
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<HeraldConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

/// Replace `${NAME}` and `${NAME:-fallback}` placeholders.
///
/// Unresolvable placeholders without a fallback are left untouched.
fn substitute_env(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let expr = &after[..end];
        let (name, fallback) = match expr.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (expr, None),
        };
        match (lookup(name), fallback) {
            (Some(value), _) if !name.is_empty() => out.push_str(&value),
            (None, Some(fallback)) if !name.is_empty() => out.push_str(fallback),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
