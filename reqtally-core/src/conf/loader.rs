use crate::conf::{ConfigError, PipelineConfig};
use std::fs;
use std::path::Path;

/// Load and validate a pipeline configuration.
///
/// `None` yields the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(path)?,
        None => PipelineConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

pub fn parse_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))
}
