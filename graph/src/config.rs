//! Normalization configuration.
//!
//! Typed settings with bon builders and environment variable fallbacks.

use bon::bon;

/// Default limit on normalization passes.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Settings for [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Passes after which normalization gives up with `FixpointNotReached`.
    pub max_passes: usize,
    /// Run operator validation before and after rewriting.
    pub validate: bool,
    /// Free nodes unreachable from any root once normalized.
    pub collect_garbage: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self { max_passes: DEFAULT_MAX_PASSES, validate: true, collect_garbage: true }
    }
}

#[bon]
impl TransformConfig {
    /// Create a transform configuration with builder pattern.
    #[builder]
    pub fn builder(
        #[builder(default = DEFAULT_MAX_PASSES)] max_passes: usize,
        #[builder(default = true)] validate: bool,
        #[builder(default = true)] collect_garbage: bool,
    ) -> Self {
        Self { max_passes, validate, collect_garbage }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VIGIL_TRANSFORM_MAX_PASSES` - Pass limit (default: 64)
    /// * `VIGIL_NO_VALIDATE` - Skip operator validation if set
    /// * `VIGIL_KEEP_GARBAGE` - Keep unreachable nodes if set
    pub fn from_env() -> Self {
        let max_passes = std::env::var("VIGIL_TRANSFORM_MAX_PASSES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_MAX_PASSES);
        let validate = std::env::var("VIGIL_NO_VALIDATE").is_err();
        let collect_garbage = std::env::var("VIGIL_KEEP_GARBAGE").is_err();

        Self { max_passes, validate, collect_garbage }
    }
}
