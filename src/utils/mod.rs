/// `research.toml` loading, defaults and validation.
pub mod config;
