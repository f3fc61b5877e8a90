//! Kjernen for PRE/POST-registrering av trenings- og velværedata og
//! øktrapport for støtteapparatet.

pub mod aggregate;
pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod metrics;
pub mod models;
pub mod render;
pub mod report;
pub mod service;
pub mod severity;
pub mod storage;
pub mod validation;
pub mod writer;

#[cfg(feature = "python")]
mod py;

pub use aggregate::{aggregate, fatigue_level, PlayerRow};
pub use auth::{AuthorizationPolicy, DenyAll, SharedSecretPolicy};
pub use config::{load_config, MonitorConfig};
pub use dates::DateLabel;
pub use error::{CoreError, RejectionReason, Result, StoreError};
pub use models::{
    Metrics, PostMetrics, PreMetrics, Roster, SessionEntry, SessionMoment, Store,
    SubmissionRecord,
};
pub use render::{CsvRenderer, JsonRenderer, ReportRenderer, TextRenderer};
pub use report::{build, ChartPoint, ReportModel, ReportTitles};
pub use service::{Export, LoadMonitor};
pub use severity::Severity;
pub use storage::{load_store, save_store, DocumentStore, JsonFileStore, MemoryStore};
pub use validation::validate;
pub use writer::{StoreWriter, WriterHandle};
