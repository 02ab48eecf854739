use log::warn;
use serde::{Deserialize, Serialize};

/// Environment variable that switches inference for unannotated fields.
pub const INFER_UNANNOTATED_ENV: &str = "OPENAPI_INFER_UNANNOTATED_TYPES";

/// Per-scan settings, read once when a scan starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Infer type and format for fields that carry no schema annotation
    pub infer_unannotated_fields: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            infer_unannotated_fields: true,
        }
    }
}

impl ScanConfig {
    /// Defaults, overridden by [`INFER_UNANNOTATED_ENV`] when it is set.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(INFER_UNANNOTATED_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(value) = value {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" => config.infer_unannotated_fields = true,
                "false" => config.infer_unannotated_fields = false,
                other => warn!("Ignoring {}={}: expected true or false", INFER_UNANNOTATED_ENV, other),
            }
        }
        config
    }

    pub fn with_inference(mut self, infer_unannotated_fields: bool) -> Self {
        self.infer_unannotated_fields = infer_unannotated_fields;
        self
    }
}
