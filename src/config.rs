use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use glob::Pattern;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::parsers::locale::LOCALE_PLACEHOLDER;
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".i18nlensrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

/// Settings the resolution engine runs with.
///
/// The engine never loads this itself; hosts pass it in (the CLI reads it
/// from [`CONFIG_FILE_NAME`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Locales in cycling order. The first one is active after start.
    #[serde(default = "default_supported_locales")]
    pub supported_locales: Vec<String>,
    #[serde(default = "default_hook_match_names")]
    pub hook_match_names: Vec<String>,
    /// Property names that select the accessor out of a destructured hook
    /// result (`const { t } = useTranslation()`).
    #[serde(default = "default_accessor_key_match")]
    pub accessor_key_match: Vec<String>,
    /// Glob templates with a `{locale}` placeholder, relative to the project
    /// root.
    #[serde(
        default = "default_locale_paths",
        alias = "localeFilePathTemplate",
        alias = "localePath",
        deserialize_with = "one_or_many"
    )]
    pub locale_paths: Vec<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_supported_locales() -> Vec<String> {
    ["zh-CN", "en-US"].map(String::from).to_vec()
}

fn default_hook_match_names() -> Vec<String> {
    ["useI18n", "useTranslation", "useTranslations", "useIntl"]
        .map(String::from)
        .to_vec()
}

fn default_accessor_key_match() -> Vec<String> {
    vec!["t".to_string()]
}

fn default_locale_paths() -> Vec<String> {
    vec!["src/**/locales/**/{locale}.json".to_string()]
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(template) => vec![template],
        OneOrMany::Many(templates) => templates,
    })
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            supported_locales: default_supported_locales(),
            hook_match_names: default_hook_match_names(),
            accessor_key_match: default_accessor_key_match(),
            locale_paths: default_locale_paths(),
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl EngineConfig {
    pub fn is_hook(&self, name: &str) -> bool {
        self.hook_match_names.iter().any(|h| h == name)
    }

    pub fn is_accessor_key(&self, key: &str) -> bool {
        self.accessor_key_match.iter().any(|k| k == key)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the settings the dictionary and watcher depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_locales.is_empty() {
            return Err(ConfigError::NoSupportedLocales);
        }
        if self.hook_match_names.is_empty() {
            return Err(ConfigError::NoHookNames);
        }
        if self.locale_paths.is_empty() {
            return Err(ConfigError::NoLocaleTemplate);
        }
        for template in &self.locale_paths {
            if !template.contains(LOCALE_PLACEHOLDER) {
                return Err(ConfigError::MissingLocalePlaceholder(template.clone()));
            }
            let probe = template.replace(LOCALE_PLACEHOLDER, "locale");
            Pattern::new(&probe).map_err(|e| ConfigError::InvalidTemplate {
                template: template.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Contents of the config file: engine settings plus CLI source scanning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub engine: EngineConfig,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            includes: default_includes(),
            ignores: default_ignores(),
            ignore_test_files: default_ignore_test_files(),
        }
    }
}

impl Config {
    /// Validate engine settings and the glob patterns in `ignores`/`includes`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        for pattern in &self.ignores {
            Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                field: "ignores",
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }

        // Patterns without wildcards are literal directories, so `app/[locale]`
        // stays valid.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    field: "includes",
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Config::default())
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config came from; `None` when defaults are used.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }

    /// Directory locale templates and includes are relative to.
    pub fn root_dir(&self, start_dir: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(start_dir)
            .to_path_buf()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult, ConfigError> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config: Config =
                serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
