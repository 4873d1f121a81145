//! Configuration loading, env substitution, and schema.
//!
//! Config files: `docmill.toml`, `docmill.yaml`, or `docmill.json`,
//! searched in `./` then `~/.config/docmill/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{AgentsConfig, ChannelConfig, DocmillConfig, PipelineConfig, StageAgentConfig},
};
