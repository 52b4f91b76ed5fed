//! Configuration loading for the ClinicDesk console.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use clinicdesk_core::{ActiveSectionResolver, DeskSession, NavSection, NavTree, NavTreeError, SectionId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "CLINICDESK_TUI_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    /// JSON file holding the latest triage snapshot and badge counts.
    pub snapshot_path: PathBuf,
    pub refresh_interval_ms: u64,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    /// Optional. Section whose badge mirrors the unread count.
    #[serde(default)]
    pub inbox_section: Option<SectionId>,
    pub initial_path: String,
    pub theme: ThemeConfig,
    pub resolver: ActiveSectionResolver,
    pub sections: Vec<NavSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or CLINICDESK_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid navigation tree: {0}")]
    Nav(#[from] NavTreeError),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(invalid("snapshot_path", "must not be empty"));
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(invalid("persistence_path", "must not be empty"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(invalid("log_path", "must not be empty"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms", "must be > 0"));
        }
        if !self.initial_path.starts_with('/') {
            return Err(invalid("initial_path", "must start with '/'"));
        }
        if self.theme.name.trim().is_empty() {
            return Err(invalid("theme.name", "must not be empty"));
        }
        if self.theme.name.to_ascii_lowercase() != "clinic" {
            return Err(invalid("theme.name", "only 'clinic' is supported"));
        }
        if self.sections.is_empty() {
            return Err(invalid("sections", "at least one section is required"));
        }

        let nav = NavTree::new(self.sections.clone())?;
        let is_top_level = |id: &SectionId| self.sections.iter().any(|s| &s.id == id);

        if !is_top_level(&self.resolver.default_section) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.default_section",
                reason: format!("'{}' is not a top-level section", self.resolver.default_section),
            });
        }
        for (segment, target) in &self.resolver.aliases {
            if !is_top_level(target) {
                return Err(ConfigError::InvalidValue {
                    field: "resolver.aliases",
                    reason: format!("'{}' maps to '{}', which is not a top-level section", segment, target),
                });
            }
        }
        if let Some(inbox) = &self.inbox_section {
            if !nav.contains(inbox.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "inbox_section",
                    reason: format!("'{}' is not a configured section", inbox),
                });
            }
        }
        Ok(())
    }

    /// Fresh session for the configured sidebar, positioned at `initial_path`.
    pub fn build_session(&self) -> Result<DeskSession, ConfigError> {
        let nav = NavTree::new(self.sections.clone())?;
        let session = DeskSession::new(nav, self.resolver.clone()).with_path(self.initial_path.clone());
        Ok(match &self.inbox_section {
            Some(id) => session.with_inbox_section(id.clone()),
            None => session,
        })
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
snapshot_path = "var/snapshot.json"
refresh_interval_ms = 2000
persistence_path = "var/prefs.json"
log_path = "var/clinicdesk.log"
inbox_section = "messages"
initial_path = "/"

[theme]
name = "clinic"

[resolver]
default_section = "home"

[resolver.aliases]
chronic-conditions = "patients"

[[sections]]
id = "home"
label = "Dashboard"
path = "/"

[[sections]]
id = "patients"
label = "Patients"
path = "/patients"
has_submenu = true

[[sections.children]]
id = "intake-forms"
label = "Intake Forms"
path = "/intake-forms"

[[sections]]
id = "messages"
label = "Messages"
path = "/messages"
"#;

    #[test]
    fn test_sample_parses_and_validates() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.sections.len(), 3);
        assert_eq!(config.sections[1].children.len(), 1);
        assert_eq!(config.resolver.aliases.len(), 1);
    }

    #[test]
    fn test_build_session_starts_at_initial_path() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        let session = config.build_session().unwrap();
        assert_eq!(session.current_path(), "/");
        assert_eq!(session.inbox_section().map(SectionId::as_str), Some("messages"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let contents = format!("{}\nwidth = 80\n", SAMPLE);
        assert!(matches!(
            TuiConfig::from_toml(&contents),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_alias_to_unknown_section_rejected() {
        let mut config = TuiConfig::from_toml(SAMPLE).unwrap();
        config
            .resolver
            .aliases
            .insert("refills".to_string(), SectionId::new("pharmacy"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "resolver.aliases", .. })
        ));
    }

    #[test]
    fn test_children_without_submenu_rejected() {
        let contents = SAMPLE.replace("has_submenu = true\n", "");
        let config = TuiConfig::from_toml(&contents).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Nav(_))));
    }
}
