/// Configuration system for portwatch.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::PortwatchConfig::default()`]
/// 2. **User global config**: `~/.portwatch/config.toml`
/// 3. **Project local config**: `.portwatch.toml` in the current working directory
/// 4. **Environment variables**: `PORTWATCH_*` overrides (highest precedence)
///
/// # Usage
///
/// ```rust,ignore
/// use portwatch::config;
///
/// let cfg = config::load();
/// let client = AgentClient::from_config(&cfg);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::PortwatchConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved portwatch configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. File layers merge key by key, so a project file only overrides the
/// keys it sets.
pub fn load() -> PortwatchConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    // Layers 2 and 3: ~/.portwatch/config.toml, then .portwatch.toml
    for path in [global_config_path(), project_config_path()] {
        if let Some(layer) = load_toml_layer(path) {
            merge_toml(&mut merged, layer);
        }
    }

    let mut config: PortwatchConfig = merged.try_into().unwrap_or_default();

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file as a raw value tree (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content does not fit the schema. A broken config file must never stop
/// the dashboard.
fn load_toml_layer(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    value.clone().try_into::<PortwatchConfig>().ok()?;
    Some(value)
}

/// Recursively merge `overlay` into `base`. Tables merge per key; any other
/// value in the overlay replaces the base value.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.portwatch/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".portwatch").join("config.toml"))
}

/// Path to the project local config: `.portwatch.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".portwatch.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `PORTWATCH_API_URL`: agent service base URL
/// - `PORTWATCH_BIND`: dashboard bind address
/// - `PORTWATCH_OPEN_BROWSER`: open the browser on `portwatch web`
/// - `PORTWATCH_DEDUP_WINDOW`: quick-action dedup window
/// - `PORTWATCH_LOGGING`: activity log on/off
fn apply_env_overrides(config: &mut PortwatchConfig) {
    if let Ok(val) = std::env::var("PORTWATCH_API_URL")
        && !val.is_empty()
    {
        config.agent.base_url = val;
    }
    if let Ok(val) = std::env::var("PORTWATCH_BIND")
        && !val.is_empty()
    {
        config.web.bind = val;
    }
    if let Ok(val) = std::env::var("PORTWATCH_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("PORTWATCH_DEDUP_WINDOW")
        && let Ok(window) = val.parse::<usize>()
    {
        config.session.dedup_window = window;
    }
    if let Ok(val) = std::env::var("PORTWATCH_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.portwatch/config.toml`.
///
/// Creates the `~/.portwatch/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.portwatch/ directory")?;
    }

    fs::write(&path, PortwatchConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or the defaults), updates the dotted key
/// (e.g. `agent.timeouts.chat`), and writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let source = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&PortwatchConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&source).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject edits that no longer deserialize into the schema
    let updated = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    toml::from_str::<PortwatchConfig>(&updated)
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The existing value's type decides how `raw_value` is parsed.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str(
            r#"
[agent]
base_url = "http://127.0.0.1:8000"
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "agent.base_url", "http://agent:9000").unwrap();
        assert_eq!(
            root["agent"]["base_url"].as_str(),
            Some("http://agent:9000")
        );
    }

    #[test]
    fn set_toml_value_updates_nested_integer() {
        let mut root: toml::Value = toml::from_str(
            r#"
[agent.timeouts]
chat = 45
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "agent.timeouts.chat", "90").unwrap();
        assert_eq!(root["agent"]["timeouts"]["chat"].as_integer(), Some(90));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str(
            r#"
[logging]
enabled = true
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "logging.enabled", "off").unwrap();
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_bad_integer() {
        let mut root: toml::Value = toml::from_str("[session]\ndedup_window = 5\n").unwrap();
        assert!(set_toml_value(&mut root, "session.dedup_window", "many").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[session]\ndedup_window = 5\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "session.typo", "3").is_err());
        assert!(set_toml_value(&mut root, "session", "3").is_err());
        assert!(set_toml_value(&mut root, "", "3").is_err());
    }

    #[test]
    fn merge_toml_keeps_keys_the_overlay_does_not_set() {
        let mut base: toml::Value = toml::from_str(
            r#"
[agent]
base_url = "http://global:8000"

[agent.timeouts]
chat = 90
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[agent.timeouts]
report = 120

[session]
dedup_window = 3
"#,
        )
        .unwrap();
        merge_toml(&mut base, overlay);

        let config: PortwatchConfig = base.try_into().unwrap();
        assert_eq!(config.agent.base_url, "http://global:8000");
        assert_eq!(config.agent.timeouts.chat, 90);
        assert_eq!(config.agent.timeouts.report, 120);
        assert_eq!(config.session.dedup_window, 3);
        assert_eq!(config.session.history_display, 6);
    }

    #[test]
    fn show_effective_config_round_trips() {
        let toml_str = show_effective_config().unwrap();
        let _: PortwatchConfig = toml::from_str(&toml_str).unwrap();
    }
}
