mod constraints;
mod error;
mod loader;
mod pipeline;


pub use constraints::RangeConstraint;
pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use pipeline::PipelineConfig;
