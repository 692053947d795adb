use thiserror::Error;

/// Recoverable outcomes the engine's callers need to tell apart.
/// Infrastructure failures travel as `Db`; everything else maps to a
/// specific condition the serving layer can translate on its own terms.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not found")]
    NotFound,

    #[error("analysis window end date precedes start date")]
    InvalidWindow,

    #[error("stored analysis payload is unreadable")]
    CorruptedCache(#[source] serde_json::Error),

    #[error("the analyzer could not interpret the input")]
    CouldNotAnalyze,

    #[error("daily request quota exhausted")]
    QuotaExhausted,

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}
