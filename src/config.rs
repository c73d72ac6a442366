//! Lister configuration.

use clap::Parser;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::error::{ListerError, ListerResult};
use crate::registry::{GrainRegistration, GrainRegistry};

/// Account name of the local storage emulator.
pub const DEV_STORAGE_ACCOUNT: &str = "devstoreaccount1";

/// Account key of the local storage emulator (base64 encoded).
pub const DEV_STORAGE_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Blob endpoint of the local storage emulator.
pub const DEV_STORAGE_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Settings file read from the working directory by default.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "grain-lister")]
#[command(about = "Lists persisted grain identifiers from Azure Blob Storage")]
#[command(version)]
pub struct Args {
    /// Settings file to read.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Storage connection string (overrides the settings file).
    #[arg(long, env = "GRAIN_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Storage container name (overrides the settings file).
    #[arg(long, env = "GRAIN_STORAGE_CONTAINER_NAME")]
    pub container: Option<String>,

    /// Blobs requested per listing page.
    #[arg(long)]
    pub page_size: Option<NonZeroU32>,

    /// Exit without waiting for a line on stdin.
    #[arg(long)]
    pub no_pause: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Enable silent mode (errors only).
    #[arg(long, short = 's')]
    pub silent: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            settings: PathBuf::from(DEFAULT_SETTINGS_FILE),
            connection_string: None,
            container: None,
            page_size: None,
            no_pause: false,
            debug: false,
            silent: false,
        }
    }
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    pub grain_storage_connection_string: Option<String>,
    pub grain_storage_container_name: Option<String>,
    pub grain_types: Option<Vec<GrainRegistration>>,
    pub page_size: Option<NonZeroU32>,
}

impl Settings {
    /// Reads settings from a JSON file. The file must exist.
    pub fn from_file(path: &Path) -> ListerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ListerError::Config(format!("cannot read settings file {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> ListerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection_string: String,
    pub container_name: String,
    pub registry: GrainRegistry,
    pub page_size: Option<NonZeroU32>,
}

impl Config {
    /// Loads the settings file named by `args` and applies overrides.
    pub fn load(args: &Args) -> ListerResult<Self> {
        let settings = Settings::from_file(&args.settings)?;
        Self::resolve(args, settings)
    }

    /// Merges settings with arguments. Arguments (and their environment
    /// variables) win over the settings file.
    pub fn resolve(args: &Args, settings: Settings) -> ListerResult<Self> {
        let connection_string = non_empty(args.connection_string.clone())
            .or_else(|| non_empty(settings.grain_storage_connection_string))
            .ok_or_else(|| {
                ListerError::Config("GrainStorageConnectionString is not set".into())
            })?;

        let container_name = non_empty(args.container.clone())
            .or_else(|| non_empty(settings.grain_storage_container_name))
            .ok_or_else(|| ListerError::Config("GrainStorageContainerName is not set".into()))?;

        let registry = match settings.grain_types {
            Some(entries) => GrainRegistry::new(entries)?,
            None => GrainRegistry::default(),
        };

        Ok(Self {
            connection_string,
            container_name,
            registry,
            page_size: args.page_size.or(settings.page_size),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
