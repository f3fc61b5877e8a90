use log::debug;
use serde::Serialize;

use crate::dates::DateLabel;
use crate::models::{Metrics, PostMetrics, PreMetrics, Roster, Store};
use crate::severity::Severity;

/// Sammenslått visning for én spiller på én dato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRow {
    pub player: String,
    pub pre: Option<PreMetrics>,
    pub post: Option<PostMetrics>,
    pub fatigue_level: i32,
    pub band: Severity,
}

impl PlayerRow {
    pub fn has_data(&self) -> bool {
        self.pre.is_some() || self.post.is_some()
    }
}

/// Fatigue-nivå: POST `current_fatigue` hvis finnes, ellers PRE
/// `muscular_fatigue`, ellers 0.
pub fn fatigue_level(pre: Option<&PreMetrics>, post: Option<&PostMetrics>) -> i32 {
    match (pre, post) {
        (_, Some(p)) => p.current_fatigue,
        (Some(p), None) => p.muscular_fatigue,
        (None, None) => 0,
    }
}

/// Én rad per spiller i troppens rekkefølge, også for spillere uten data.
///
/// Ved duplikater (korrupte data) vinner første treff i innsendingsrekkefølge.
pub fn aggregate(store: &Store, date: &DateLabel, roster: &Roster) -> Vec<PlayerRow> {
    let rows: Vec<PlayerRow> = roster
        .iter()
        .map(|player| {
            let mut pre = None;
            let mut post = None;
            for entry in store.entries(player).iter().filter(|e| &e.date == date) {
                match &entry.metrics {
                    Metrics::Pre(m) if pre.is_none() => pre = Some(*m),
                    Metrics::Post(m) if post.is_none() => post = Some(*m),
                    _ => {}
                }
            }

            let level = fatigue_level(pre.as_ref(), post.as_ref());
            PlayerRow {
                player: player.to_string(),
                pre,
                post,
                fatigue_level: level,
                band: Severity::classify_clamped(level),
            }
        })
        .collect();

    debug!(
        "aggregate {}: {} rader, {} med data",
        date,
        rows.len(),
        rows.iter().filter(|r| r.has_data()).count()
    );
    rows
}
