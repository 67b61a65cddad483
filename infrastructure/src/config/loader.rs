//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["megaverse.toml", ".megaverse.toml"];

/// Prefix for environment overrides (`MEGAVERSE_DISPATCH__CONCURRENCY_LIMIT=4`)
const ENV_PREFIX: &str = "MEGAVERSE_";

/// Shorthand environment variable for the candidate id
const ENV_CANDIDATE_ID: &str = "MEGAVERSE_CANDIDATE_ID";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `MEGAVERSE_<SECTION>__<KEY>`, `MEGAVERSE_CANDIDATE_ID`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./megaverse.toml` or `./.megaverse.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/megaverse/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Every source merged in priority order, not yet extracted
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[ENV_CANDIDATE_ID])
                    .map(|_| "megaverse.candidate_id".into()),
            )
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/megaverse/config.toml if set,
    /// otherwise falls back to ~/.config/megaverse/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("megaverse").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        for line in Self::config_sources(config_path) {
            println!("  {}", line);
        }
    }

    /// One line per source, highest priority first, marking files that exist
    pub fn config_sources(config_path: Option<&PathBuf>) -> Vec<String> {
        let mark = |path: &PathBuf| if path.exists() { "FOUND" } else { "     " };
        let mut lines = vec![format!(
            "[ENV  ] {}<SECTION>__<KEY>, {}",
            ENV_PREFIX, ENV_CANDIDATE_ID
        )];

        if let Some(path) = config_path {
            lines.push(format!("[{}] Config:  {}", mark(path), path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("[FOUND] Project: {}", path.display())),
            None => lines.push("[     ] Project: ./megaverse.toml or ./.megaverse.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            lines.push(format!("[{}] Global:  {}", mark(&path), path.display()));
        }

        lines.push("[     ] Default: built-in defaults".to_string());
        lines
    }
}
