//! Fedicensus configuration loading and resolution.
//!
//! This crate provides:
//! - Settings resolution (CLI → env → defaults)
//! - The bearer token read from the process environment

pub mod resolve;
pub mod token;

pub use resolve::{resolve_settings, resolve_settings_with, Settings, SettingsOverrides};
pub use token::ApiToken;

/// Environment variable holding the directory API bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "INSTANCES_SOCIAL_TOKEN";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "FEDICENSUS_DATA";

/// Environment variable overriding the directory API endpoint.
pub const ENV_ENDPOINT: &str = "FEDICENSUS_ENDPOINT";

/// Default directory API endpoint listing all instances.
pub const DEFAULT_ENDPOINT: &str = "https://instances.social/api/1.0/instances/list";

/// Fixed request deadline for the directory API call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Half-width of the temporal filter window around the reference time.
pub const DEFAULT_WINDOW_SECS: u64 = 60 * 60;

/// Timeline store file name inside the data directory.
pub const TIMELINE_FILE: &str = "timeline.parquet";

/// Directory store file name inside the data directory.
pub const DIRECTORY_FILE: &str = "directory.parquet";
