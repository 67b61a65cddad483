//! Configuration file loading for megaverse
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`MEGAVERSE_<SECTION>__<KEY>`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./megaverse.toml` or `./.megaverse.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/megaverse/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDispatchConfig, FileMegaverseConfig, FileOutputConfig, FileRetryConfig,
};
pub use loader::ConfigLoader;
