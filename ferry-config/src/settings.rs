use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use ferry_core::infra::DEFAULT_SECRET_MASK;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "FERRY_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "FERRY_CONFIG_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "ferry.toml",
    "ferry.json",
    "config/ferry.toml",
    "config/ferry.json",
];

/// Runtime settings for Ferry binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerryConfig {
    /// State snapshot with definitions, instances, syncs, and cached specs.
    pub state_path: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub merge: MergeConfig,
    pub jobs: JobsConfig,
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("ferry-state.toml"),
            log_filter: "info".to_string(),
            merge: MergeConfig::default(),
            jobs: JobsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Value clients send back in place of a secret they never saw.
    pub secret_mask: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            secret_mask: DEFAULT_SECRET_MASK.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Trailing log lines attached to synchronous job info; 0 disables.
    pub log_tail_lines: usize,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    ExplicitPath(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    DefaultFile(PathBuf),
    Defaults,
}

#[derive(Debug, Clone)]
pub struct ConfigMetadata {
    pub env_file_loaded: bool,
    pub source: ConfigSource,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: FerryConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Directory the default candidates are resolved against.
    pub search_root: Option<PathBuf>,
}

/// Resolves [`FerryConfig`]. Evaluation order:
/// 1) an explicit path handed to the loader,
/// 2) `$FERRY_CONFIG_PATH` (TOML or JSON file),
/// 3) `$FERRY_CONFIG_JSON` (inline JSON),
/// 4) the first existing default candidate file,
/// 5) defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_search_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.options.search_root = Some(root.into());
        self
    }

    pub fn load(&self) -> anyhow::Result<ConfigLoad> {
        let env_file_loaded = self.load_env_file()?;

        if let Some(path) = &self.options.config_path {
            return Ok(ConfigLoad {
                config: FerryConfig::load_from_file(path)?,
                metadata: ConfigMetadata {
                    env_file_loaded,
                    source: ConfigSource::ExplicitPath(path.clone()),
                },
            });
        }

        let (config, source) = if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            (FerryConfig::load_from_file(&path)?, ConfigSource::EnvPath(path))
        } else if let Ok(raw) = env::var(CONFIG_JSON_ENV) {
            let config = FerryConfig::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            (config, ConfigSource::EnvInline)
        } else if let Some(path) = self.find_default_file() {
            (FerryConfig::load_from_file(&path)?, ConfigSource::DefaultFile(path))
        } else {
            (FerryConfig::default(), ConfigSource::Defaults)
        };

        Ok(ConfigLoad {
            config,
            metadata: ConfigMetadata {
                env_file_loaded,
                source,
            },
        })
    }

    fn load_env_file(&self) -> anyhow::Result<bool> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match loaded {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(anyhow!("failed to load .env file: {err}")),
        }
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let root = self
            .options
            .search_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists())
    }
}

impl FerryConfig {
    /// Shorthand for [`ConfigLoader::new`] followed by `load`.
    pub fn load() -> anyhow::Result<ConfigLoad> {
        ConfigLoader::new().load()
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read ferry config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid ferry config {}", path.display())),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid ferry config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse ferry config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid ferry config json: {err}"))
    }
}
