//! Engine configuration.

use bon::bon;
use vigil_graph::TransformConfig;

/// Settings for [`EngineBuilder::build`](crate::EngineBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Normalization settings applied to the rule graph.
    pub transform: TransformConfig,
    /// Refuse to build when normalization reported error diagnostics.
    pub deny_error_diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { transform: TransformConfig::default(), deny_error_diagnostics: true }
    }
}

#[bon]
impl EngineConfig {
    /// Create an engine configuration with builder pattern.
    #[builder]
    pub fn builder(
        #[builder(default)] transform: TransformConfig,
        #[builder(default = true)] deny_error_diagnostics: bool,
    ) -> Self {
        Self { transform, deny_error_diagnostics }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VIGIL_ALLOW_ERROR_DIAGNOSTICS` - Build even when validation reports errors
    /// * Transform settings as read by [`TransformConfig::from_env`]
    pub fn from_env() -> Self {
        let transform = TransformConfig::from_env();
        let deny_error_diagnostics = std::env::var("VIGIL_ALLOW_ERROR_DIAGNOSTICS").is_err();

        Self { transform, deny_error_diagnostics }
    }
}
