//! Locale-definition loading.
//!
//! A [`LocaleLoader`] turns one locale file into nested data; [`flatten_value`]
//! turns that data into the dotted-key mapping the dictionary stores.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use serde_json::Value;
use tracing::debug;

use crate::core::{FlatMessages, compose_key};
use crate::error::{ConfigError, LocaleLoadError};

/// Placeholder substituted with the locale id in path templates.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// Evaluates a locale-definition file into nested data.
///
/// Implementations are called from blocking worker threads and may do I/O.
pub trait LocaleLoader: Send + Sync + 'static {
    fn evaluate(&self, path: &Path) -> Result<Value, LocaleLoadError>;
}

/// Loads plain JSON locale files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLocaleLoader;

impl LocaleLoader for JsonLocaleLoader {
    fn evaluate(&self, path: &Path) -> Result<Value, LocaleLoadError> {
        let content = fs::read_to_string(path).map_err(|source| LocaleLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LocaleLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Evaluate and flatten one locale file.
pub fn load_flattened(
    loader: &dyn LocaleLoader,
    path: &Path,
) -> Result<FlatMessages, LocaleLoadError> {
    let value = loader.evaluate(path)?;
    let flat = flatten_value(&value);
    debug!(path = %path.display(), keys = flat.len(), "flattened locale file");
    Ok(flat)
}

/// Flatten nested locale data into dotted keys.
///
/// `{"a": {"b": "x"}}` becomes `{"a.b": "x"}`. Arrays holding only strings
/// collapse into one entry joined by `", "`; any other array expands with
/// index segments (`items.0.title`). Numbers and booleans keep their JSON
/// text, `null` and empty containers produce nothing.
pub fn flatten_value(value: &Value) -> FlatMessages {
    let mut result = FlatMessages::new();
    flatten_into(value, String::new(), &mut result);
    result
}

fn flatten_into(value: &Value, prefix: String, result: &mut FlatMessages) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_into(val, compose_key(&prefix, key), result);
            }
        }
        Value::String(s) => {
            if !prefix.is_empty() {
                result.insert(prefix, s.clone());
            }
        }
        Value::Number(n) => {
            if !prefix.is_empty() {
                result.insert(prefix, n.to_string());
            }
        }
        Value::Bool(b) => {
            if !prefix.is_empty() {
                result.insert(prefix, b.to_string());
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                return;
            }

            let is_string_array = arr.iter().all(Value::is_string);
            if is_string_array && !prefix.is_empty() {
                let values: Vec<&str> = arr.iter().filter_map(Value::as_str).collect();
                result.insert(prefix, values.join(", "));
            } else {
                for (index, val) in arr.iter().enumerate() {
                    flatten_into(val, compose_key(&prefix, &index.to_string()), result);
                }
            }
        }
        Value::Null => {}
    }
}

/// Resolve locale path templates to the files of one locale.
///
/// Relative templates are anchored at `root_dir`. Files are returned in
/// template order, each template's matches sorted, without duplicates.
pub fn locale_files(
    templates: &[String],
    locale: &str,
    root_dir: &Path,
) -> Result<Vec<PathBuf>, ConfigError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for template in templates {
        let pattern = expand_template(template, locale, root_dir)?;
        let entries = glob(&pattern).map_err(|e| ConfigError::InvalidTemplate {
            template: template.clone(),
            message: e.to_string(),
        })?;
        for path in entries.flatten() {
            if path.is_file() && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Substitute `{locale}` and anchor the template at `root_dir`.
fn expand_template(template: &str, locale: &str, root_dir: &Path) -> Result<String, ConfigError> {
    if !template.contains(LOCALE_PLACEHOLDER) {
        return Err(ConfigError::MissingLocalePlaceholder(template.to_string()));
    }
    let relative = template.replace(LOCALE_PLACEHOLDER, &Pattern::escape(locale));
    if Path::new(&relative).is_absolute() {
        return Ok(relative);
    }
    let root = Pattern::escape(&root_dir.to_string_lossy());
    Ok(format!("{}/{}", root.trim_end_matches('/'), relative))
}
