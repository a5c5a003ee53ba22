use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::error::AppResult;
use crate::services::PushTarget;

pub const OLLAMA_PROVIDER: &str = "ollama";
pub const OPENAI_PROVIDER: &str = "openai";
pub const ANTHROPIC_PROVIDER: &str = "anthropic";

const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:8b";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_EDITOR: &str = "nano";

/// Local inference can be slow on modest hardware.
const DEFAULT_LOCAL_TIMEOUT_SECS: u64 = 120;
const LOCAL_TIMEOUT_ENV_VAR: &str = "COMMITSKI_LOCAL_TIMEOUT";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub workspace_root: PathBuf,
    pub default_provider: String,
    pub ollama: LocalSettings,
    pub openai: RemoteSettings,
    pub anthropic: RemoteSettings,
    pub editor: String,
    pub push_target: PushTarget,
}

#[derive(Debug, Clone)]
pub struct LocalSettings {
    pub program: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        Ok(Self::from_lookup(workspace_hint, |key| env::var(key).ok()))
    }

    /// Resolves every setting through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(workspace_hint: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Self {
            workspace_root: workspace_hint.to_path_buf(),
            default_provider: or_default("COMMITSKI_PROVIDER", OLLAMA_PROVIDER).to_lowercase(),
            ollama: LocalSettings {
                program: or_default("COMMITSKI_OLLAMA_BIN", "ollama"),
                model: or_default("COMMITSKI_OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
                timeout: parse_timeout(var(LOCAL_TIMEOUT_ENV_VAR)),
            },
            openai: RemoteSettings {
                api_key: var("OPENAI_API_KEY"),
                model: or_default("COMMITSKI_OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            anthropic: RemoteSettings {
                api_key: var("ANTHROPIC_API_KEY"),
                model: or_default("COMMITSKI_ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
                base_url: or_default("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
            },
            editor: var("VISUAL")
                .or_else(|| var("EDITOR"))
                .unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            push_target: PushTarget {
                remote: or_default("COMMITSKI_REMOTE", "origin"),
                branch: var("COMMITSKI_BRANCH"),
            },
        }
    }

    /// Human-readable settings with secrets masked, for the startup log.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("workspace", self.workspace_root.display().to_string()),
            ("default provider", self.default_provider.clone()),
            ("ollama model", self.ollama.model.clone()),
            (
                "ollama timeout",
                format!("{}s", self.ollama.timeout.as_secs()),
            ),
            ("openai model", self.openai.model.clone()),
            ("openai api key", mask_secret(&self.openai.api_key)),
            ("anthropic model", self.anthropic.model.clone()),
            ("anthropic api key", mask_secret(&self.anthropic.api_key)),
            ("editor", self.editor.clone()),
            (
                "push target",
                format!(
                    "{} {}",
                    self.push_target.remote,
                    self.push_target.refspec()
                ),
            ),
        ]
    }
}

fn parse_timeout(value: Option<String>) -> Duration {
    match value {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    LOCAL_TIMEOUT_ENV_VAR, raw, DEFAULT_LOCAL_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_LOCAL_TIMEOUT_SECS)
            }
        },
        None => Duration::from_secs(DEFAULT_LOCAL_TIMEOUT_SECS),
    }
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix: String = token.chars().take(3).collect();
            let suffix: String = token.chars().skip(token.chars().count() - 3).collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(Path::new("/work"), |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.default_provider, OLLAMA_PROVIDER);
        assert_eq!(config.ollama.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.ollama.program, "ollama");
        assert_eq!(
            config.ollama.timeout,
            Duration::from_secs(DEFAULT_LOCAL_TIMEOUT_SECS)
        );
        assert!(config.openai.api_key.is_none());
        assert!(config.anthropic.api_key.is_none());
        assert_eq!(config.editor, DEFAULT_EDITOR);
        assert_eq!(config.push_target, PushTarget::default());
        assert_eq!(config.workspace_root, PathBuf::from("/work"));
    }

    #[test]
    fn reads_credentials_models_and_editor() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-openai-123456"),
            ("ANTHROPIC_API_KEY", " sk-ant-abcdef "),
            ("COMMITSKI_OLLAMA_MODEL", "llama3"),
            ("COMMITSKI_PROVIDER", "Anthropic"),
            ("EDITOR", "vim"),
            ("COMMITSKI_BRANCH", "main"),
        ]);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-openai-123456"));
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-abcdef"));
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.default_provider, ANTHROPIC_PROVIDER);
        assert_eq!(config.editor, "vim");
        assert_eq!(config.push_target.refspec(), "main");
    }

    #[test]
    fn visual_takes_precedence_over_editor() {
        let config = config_from(&[("VISUAL", "code --wait"), ("EDITOR", "vim")]);
        assert_eq!(config.editor, "code --wait");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "   "), ("EDITOR", "")]);
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.editor, DEFAULT_EDITOR);
    }

    #[test]
    fn timeout_from_env() {
        let config = config_from(&[(LOCAL_TIMEOUT_ENV_VAR, "45")]);
        assert_eq!(config.ollama.timeout, Duration::from_secs(45));
    }

    #[test]
    fn invalid_timeout_uses_default() {
        for raw in ["not_a_number", "0", "-3"] {
            let config = config_from(&[(LOCAL_TIMEOUT_ENV_VAR, raw)]);
            assert_eq!(
                config.ollama.timeout,
                Duration::from_secs(DEFAULT_LOCAL_TIMEOUT_SECS)
            );
        }
    }

    #[test]
    fn masks_multibyte_secrets_by_character() {
        let config = config_from(&[("OPENAI_API_KEY", "ключ-секрет")]);
        let summary = config.summary();
        let openai_key = summary
            .iter()
            .find(|(label, _)| *label == "openai api key")
            .map(|(_, value)| value.as_str());
        assert_eq!(openai_key, Some("клю***рет"));
        assert_eq!(mask_secret(&Some("ключ".to_string())), "***");
    }

    #[test]
    fn summary_masks_secrets() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-openai-123456")]);
        let summary = config.summary();
        let openai_key = summary
            .iter()
            .find(|(label, _)| *label == "openai api key")
            .map(|(_, value)| value.as_str());
        assert_eq!(openai_key, Some("sk-***456"));
        assert!(
            summary
                .iter()
                .any(|(label, value)| *label == "anthropic api key" && value == "<not set>")
        );
    }
}
