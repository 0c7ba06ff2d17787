//! Layered configuration and path helpers.
//!
//! Figment merges `compath.toml` + `compath.<env>.toml` + `COMPATH_*` env vars
//! into [`Settings`]. Paths accept `~` and `${VAR}` and are resolved against a
//! base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_MIN_GENE_SET_SIMILARITY: f64 = 0.8;
pub const DEFAULT_MIN_STRING_SIMILARITY: f64 = 0.0;

/// Settings for one similarity run.
///
/// Thresholds outside `[0, 1]` are accepted as-is: a negative value keeps every
/// row, a value above one drops every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_dir: String,
    pub output_dir: String,
    pub min_gene_set_similarity: f64,
    pub min_string_similarity: f64,
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: "data/gmt".to_string(),
            output_dir: "~/compath-mappings".to_string(),
            min_gene_set_similarity: DEFAULT_MIN_GENE_SET_SIMILARITY,
            min_string_similarity: DEFAULT_MIN_STRING_SIMILARITY,
            progress: true,
        }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Loads configuration files from the working directory.
    pub fn load() -> Result<Self> { Self::load_from(Path::new(".")) }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("compath.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("compath.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("compath.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("compath.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("COMPATH_"));

        Ok(Self { figment })
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
