use serde::{Deserialize, Serialize};

use crate::error::RejectionReason;
use crate::validation::{SCALE_MAX, SCALE_MIN};

/// Kvalitativt bånd for en 0–10-verdi (visuell vekt i rapporten).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// < 5 => Low, 5..=8 => Medium, > 8 => High.
    pub fn classify(value: i32) -> Result<Severity, RejectionReason> {
        if !(SCALE_MIN..=SCALE_MAX).contains(&value) {
            return Err(RejectionReason::OutOfRangeMetric {
                field: "value",
                value,
            });
        }
        Ok(Self::classify_clamped(value))
    }

    /// Total variant: klemmer til skalaen før klassifisering.
    pub fn classify_clamped(value: i32) -> Severity {
        match value.clamp(SCALE_MIN, SCALE_MAX) {
            v if v < 5 => Severity::Low,
            v if v <= 8 => Severity::Medium,
            _ => Severity::High,
        }
    }

    /// Uthevingsfarge (RGB): svart / blå / rød.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Severity::Low => (0, 0, 0),
            Severity::Medium => (0, 0, 255),
            Severity::High => (255, 0, 0),
        }
    }

    /// Søylefarge i fatigue-grafen.
    pub fn chart_hex(self) -> &'static str {
        match self {
            Severity::Low => "#1f2937",
            Severity::Medium => "#3b82f6",
            Severity::High => "#ef4444",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}
