use crate::error::RejectionReason;
use crate::models::{Metrics, Roster, Store, SubmissionRecord};

pub const SCALE_MIN: i32 = 0;
pub const SCALE_MAX: i32 = 10;

/// Alle felter må ligge i [0, 10]. Første felt utenfor skalaen rapporteres.
pub fn check_range(metrics: &Metrics) -> Result<(), RejectionReason> {
    for (field, value) in metrics.fields() {
        if !(SCALE_MIN..=SCALE_MAX).contains(&value) {
            return Err(RejectionReason::OutOfRangeMetric { field, value });
        }
    }
    Ok(())
}

/// Sjekk en kandidat før den slippes inn i lageret.
///
/// Rekkefølge: tropp, form (moment vs. metrikker), skala, duplikat.
/// Lageret endres ikke her; kalleren legger til ved `Ok`.
pub fn validate(
    store: &Store,
    candidate: &SubmissionRecord,
    roster: &Roster,
) -> Result<(), RejectionReason> {
    if !roster.contains(&candidate.player) {
        return Err(RejectionReason::UnknownPlayer(candidate.player.clone()));
    }

    if candidate.metrics.moment() != candidate.moment {
        return Err(RejectionReason::MomentMetricMismatch {
            moment: candidate.moment,
        });
    }

    check_range(&candidate.metrics)?;

    if store.contains(&candidate.player, &candidate.date, candidate.moment) {
        return Err(RejectionReason::DuplicateSubmission {
            player: candidate.player.clone(),
            date: candidate.date.to_string(),
            moment: candidate.moment,
        });
    }

    Ok(())
}
