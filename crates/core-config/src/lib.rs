//! Configuration loading and layering.
//!
//! Parses `tobj.toml` (or an override path provided by the binary). Only the
//! `[textobject]` table is recognised:
//!
//! ```toml
//! [textobject]
//! n_lines = 50
//! search_method = "cover_or_next"
//!
//! [textobject.custom]
//! x = ["%b()", "^.().*().$"]
//! z = [["%b()", "%b[]"], "^.().*().$"]
//! ```
//!
//! Every field is optional. Effective settings come from
//! [`resolve_layers`]: built-in defaults, then the file, then a buffer-local
//! overlay. Unknown fields are ignored. A file that fails to parse is reported
//! and replaced by defaults.

use anyhow::Result;
use core_textobject::{DEFAULT_N_LINES, SearchMethod};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// One level of a custom textobject: a pattern or a list of alternatives.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PatternLevel {
    One(String),
    Many(Vec<String>),
}

/// A partial `[textobject]` table. `None` leaves the field to earlier layers.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct TextobjectLayer {
    #[serde(default)]
    pub n_lines: Option<usize>,
    #[serde(default)]
    pub search_method: Option<String>,
    #[serde(default)]
    pub custom: BTreeMap<String, Vec<PatternLevel>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub textobject: TextobjectLayer,
}

/// Effective textobject settings after layering.
///
/// `search_method` stays textual; it is validated when search options are
/// resolved so an invalid value fails the request rather than the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextobjectConfig {
    pub n_lines: usize,
    pub search_method: String,
    pub custom: BTreeMap<char, Vec<PatternLevel>>,
}

impl Default for TextobjectConfig {
    fn default() -> Self {
        Self {
            n_lines: DEFAULT_N_LINES,
            search_method: SearchMethod::default().as_str().to_string(),
            custom: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,      // original file string (optional)
    pub path: Option<PathBuf>,    // file the config was read from
    pub file: ConfigFile,         // parsed (or default) data
}

impl Config {
    /// Settings for one request: defaults, then this file, then `local`.
    pub fn textobject(&self, local: &TextobjectLayer) -> TextobjectConfig {
        resolve_layers(&TextobjectConfig::default(), &self.file.textobject, local)
    }
}

/// Merge layers in order; later layers win per field and custom textobjects
/// merge per id. Custom keys that are not a single character are skipped.
pub fn resolve_layers(
    defaults: &TextobjectConfig,
    global: &TextobjectLayer,
    local: &TextobjectLayer,
) -> TextobjectConfig {
    let mut out = defaults.clone();
    for layer in [global, local] {
        if let Some(n) = layer.n_lines {
            out.n_lines = n;
        }
        if let Some(m) = &layer.search_method {
            out.search_method = m.clone();
        }
        for (key, levels) in &layer.custom {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(id), None) => {
                    out.custom.insert(id, levels.clone());
                }
                _ => warn!(target: "config", key = %key, "custom_textobject_key_ignored"),
            }
        }
    }
    out
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("tobj.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tobj").join("tobj.toml");
    }
    PathBuf::from("tobj.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), found = false, "config_load");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                found = true,
                custom = file.textobject.custom.len(),
                "config_load"
            );
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error");
            Ok(Config::default())
        }
    }
}
