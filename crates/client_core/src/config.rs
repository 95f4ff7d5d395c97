use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "factastic.toml";
pub const DEFAULT_TABLE: &str = "facts";

/// Connection settings for the hosted table service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub project_url: String,
    pub anon_key: String,
    pub table: String,
}

impl StoreSettings {
    pub fn new(project_url: impl AsRef<str>, anon_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            project_url: normalize_project_url(project_url.as_ref())?,
            anon_key: normalize_anon_key(&anon_key.into())?,
            table: DEFAULT_TABLE.to_string(),
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.project_url, self.table)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    project_url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
}

#[derive(Debug, Default)]
struct PartialSettings {
    project_url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
}

impl PartialSettings {
    fn merge_file(&mut self, file: FileSettings) {
        if file.project_url.is_some() {
            self.project_url = file.project_url;
        }
        if file.anon_key.is_some() {
            self.anon_key = file.anon_key;
        }
        if file.table.is_some() {
            self.table = file.table;
        }
    }

    fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(v) = read("SUPABASE_URL") {
            self.project_url = Some(v);
        }
        if let Some(v) = read("APP__SUPABASE_URL") {
            self.project_url = Some(v);
        }

        if let Some(v) = read("SUPABASE_ANON_KEY") {
            self.anon_key = Some(v);
        }
        if let Some(v) = read("APP__SUPABASE_ANON_KEY") {
            self.anon_key = Some(v);
        }

        if let Some(v) = read("APP__FACTS_TABLE") {
            self.table = Some(v);
        }
    }

    fn finish(self) -> Result<StoreSettings> {
        let project_url = self.project_url.ok_or_else(|| {
            anyhow!("missing project url: set SUPABASE_URL or `project_url` in {CONFIG_FILE_NAME}")
        })?;
        let anon_key = self.anon_key.ok_or_else(|| {
            anyhow!("missing api key: set SUPABASE_ANON_KEY or `anon_key` in {CONFIG_FILE_NAME}")
        })?;
        let table = self
            .table
            .map(|table| table.trim().to_string())
            .filter(|table| !table.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(StoreSettings {
            project_url: normalize_project_url(&project_url)?,
            anon_key: normalize_anon_key(&anon_key)?,
            table,
        })
    }
}

/// Loads settings from an explicit file, or the first default location found, then applies
/// environment overrides.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<StoreSettings> {
    load_settings_with(explicit_path, |name| std::env::var(name).ok())
}

pub fn load_settings_with(
    explicit_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<StoreSettings> {
    let mut settings = PartialSettings::default();

    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|path| path.exists()),
    };
    if let Some(path) = path {
        settings.merge_file(read_settings_file(&path)?);
    }

    settings.merge_env(env);
    settings.finish()
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("factastic").join(CONFIG_FILE_NAME));
    }
    paths
}

fn read_settings_file(path: &Path) -> Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn normalize_anon_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("api key is empty");
    }
    Ok(trimmed.to_string())
}

fn normalize_project_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid project url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("project url '{raw}' must use http or https");
    }
    Ok(trimmed.to_string())
}
