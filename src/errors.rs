use thiserror::Error;

/// Error taxonomy for pricing computations.
///
/// `EngineBusy` and `RecalcTimeout` are transient and safe for callers to
/// retry; nothing in this crate retries internally.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("compatibility mode is off")]
    NotEnabled,

    #[error("external workbook path is empty")]
    PathMissing,

    #[error("external workbook path is invalid: {0}")]
    PathInvalid(String),

    #[error("workbook not found: {0}")]
    WorkbookNotFound(String),

    #[error("calculation engine is busy")]
    EngineBusy,

    #[error("recalculation timed out after {0} ms")]
    RecalcTimeout(u64),

    #[error("calculation engine failed during {phase}")]
    EngineFailure {
        phase: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PricingError {
    pub fn engine(phase: &'static str, source: anyhow::Error) -> Self {
        Self::EngineFailure { phase, source }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EngineBusy | Self::RecalcTimeout(_))
    }
}
