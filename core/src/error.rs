use thiserror::Error;

use crate::models::SessionMoment;

/// Felles resultattype for kjernen.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Grunner til at en innsending avvises. Aldri fatalt, vises til brukeren.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("{0} no figura en la plantilla")]
    UnknownPlayer(String),

    #[error("Atención: {player} ya ha registrado {moment} el {date}")]
    DuplicateSubmission {
        player: String,
        date: String,
        moment: SessionMoment,
    },

    #[error("{field}={value} fuera de la escala 0-10")]
    OutOfRangeMetric { field: &'static str, value: i32 },

    #[error("los datos no corresponden al momento {moment}")]
    MomentMetricMismatch { moment: SessionMoment },
}

/// Skrivefeil mot lageret. Ingen retry; innsenderen må prøve igjen.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    #[error("store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("Error al generar el documento: {0}")]
    Render(#[from] RenderError),

    #[error("store writer is not running")]
    WriterUnavailable,
}

impl RejectionReason {
    /// Kort, stabil etikett (brukes som metrics-label).
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::UnknownPlayer(_) => "unknown_player",
            RejectionReason::DuplicateSubmission { .. } => "duplicate_submission",
            RejectionReason::OutOfRangeMetric { .. } => "out_of_range_metric",
            RejectionReason::MomentMetricMismatch { .. } => "moment_metric_mismatch",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ugyldig konfig ved '{path}': {message}")]
    Parse { path: String, message: String },
}
