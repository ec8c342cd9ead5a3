use std::env;

/// Environment variable capping the longest image side before the cascade runs
pub const MAX_DIM_ENV: &str = "BARCODE_MAX_DIM";

/// Runtime settings for loading images into the cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeConfig {
    /// Downscale images whose longest side exceeds this many pixels
    pub max_dim: Option<u32>,
}

impl CascadeConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self {
            max_dim: parse_max_dim(env::var(MAX_DIM_ENV).ok().as_deref()),
        }
    }
}

/// `0`, unset or unparsable values disable downscaling
fn parse_max_dim(value: Option<&str>) -> Option<u32> {
    match value?.trim().parse::<u32>() {
        Ok(0) => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}
