//! Configuration schema, loading, and validation for sitediff.
//!
//! The schema accepts both the native snake_case keys and the key names of
//! the original JS tool's `config.json` (`projectName`, `prdDomain`,
//! `devDomain`, `urlList`, `targetDir`) so existing config files keep
//! working. Files are parsed by extension (TOML, YAML, or JSON) after
//! `${ENV_VAR}` substitution.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{discover_and_load, load_config},
    schema::{CaptureConfig, CompareConfig, PageTarget, SitediffConfig},
    validate::{Diagnostic, Severity, has_errors, validate},
};
