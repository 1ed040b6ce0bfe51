/*!
`config.rs`

Shell configuration for the `cmdloop` binary.

Sources (first hit wins):
  1. `--config PATH`
  2. `CMDLOOP_CONFIG` environment variable (non-empty)
  3. built-in defaults

Files ending in `.yaml` / `.yml` are parsed as YAML, everything else as JSON.
Unknown keys are rejected. `--prompt` is applied on top by `main`.

Example (YAML):
  prompt: "calc> "
  history_file: ~/.cmdloop_history   # taken literally, no tilde expansion
  banner: false
  line_editor: true
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cmdloop::dispatch::DEFAULT_PROMPT;

/// Environment fallback for `--config`.
pub const CONFIG_ENV: &str = "CMDLOOP_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub banner: bool,
    /// `false` reads plain lines (no completion, no history file).
    pub line_editor: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: None,
            banner: true,
            line_editor: true,
        }
    }
}

impl ReplConfig {
    /// Parse a config file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let lower = path.to_string_lossy().to_ascii_lowercase();

        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse YAML config: {}", path.display()))
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse JSON config: {}", path.display()))
        }
    }

    /// Resolve `--config`, then `env_path`, then defaults.
    pub fn resolve(flag: Option<&Path>, env_path: Option<&str>) -> Result<Self> {
        let env_path = env_path
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        match flag.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve using the process environment.
    pub fn from_env(flag: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok();
        Self::resolve(flag, env_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn file_with(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let cfg = ReplConfig::resolve(None, None).unwrap();
        assert_eq!(cfg, ReplConfig::default());
        assert_eq!(cfg.prompt, "> ");
        assert!(cfg.banner);
        assert!(cfg.line_editor);
    }

    #[test]
    fn yaml_by_extension_with_partial_keys() {
        let file = file_with(".yml", "prompt: \"calc> \"\nbanner: false\n");
        let cfg = ReplConfig::load(file.path()).unwrap();
        assert_eq!(cfg.prompt, "calc> ");
        assert!(!cfg.banner);
        assert!(cfg.line_editor);
        assert_eq!(cfg.history_file, None);
    }

    #[test]
    fn json_is_the_fallback_format() {
        let file = file_with(
            ".conf",
            r#"{ "history_file": "/tmp/hist", "line_editor": false }"#,
        );
        let cfg = ReplConfig::load(file.path()).unwrap();
        assert_eq!(cfg.history_file, Some(PathBuf::from("/tmp/hist")));
        assert!(!cfg.line_editor);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = file_with(".json", r#"{ "promt": "x" }"#);
        let err = ReplConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("promt"));
    }

    #[test]
    fn flag_beats_environment() {
        let flag = file_with(".json", r#"{ "prompt": "flag> " }"#);
        let env = file_with(".json", r#"{ "prompt": "env> " }"#);
        let env_path = env.path().to_string_lossy().into_owned();

        let cfg = ReplConfig::resolve(Some(flag.path()), Some(&env_path)).unwrap();
        assert_eq!(cfg.prompt, "flag> ");

        let cfg = ReplConfig::resolve(None, Some(&env_path)).unwrap();
        assert_eq!(cfg.prompt, "env> ");
    }

    #[test]
    fn blank_environment_value_is_ignored() {
        assert_eq!(
            ReplConfig::resolve(None, Some("  ")).unwrap(),
            ReplConfig::default()
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ReplConfig::load(Path::new("/no/such/cmdloop.yaml")).unwrap_err();
        assert!(err.to_string().contains("/no/such/cmdloop.yaml"));
    }
}
