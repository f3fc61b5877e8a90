use std::collections::BTreeSet;

use log::{info, warn};

use crate::aggregate::aggregate;
use crate::auth::AuthorizationPolicy;
use crate::config::MonitorConfig;
use crate::dates::{cmp_descending, DateLabel};
use crate::error::{CoreError, RejectionReason, Result};
use crate::metrics;
use crate::models::{PostMetrics, PreMetrics, Roster, SessionEntry, Store, SubmissionRecord};
use crate::render::ReportRenderer;
use crate::report::{build, ReportModel, ReportTitles};
use crate::storage::{DocumentStore, JsonFileStore};
use crate::validation::validate;

/// Valider og legg til i minnet. Lageret er uendret ved avvisning.
pub fn apply_submission(
    store: &mut Store,
    record: SubmissionRecord,
    roster: &Roster,
) -> std::result::Result<(), RejectionReason> {
    if let Err(reason) = validate(store, &record, roster) {
        warn!("avvist innsending fra {}: {}", record.player, reason);
        metrics::submission_rejected(reason.code());
        return Err(reason);
    }

    let moment = record.moment;
    store.append(
        &record.player,
        SessionEntry {
            date: record.date,
            metrics: record.metrics,
        },
    );
    metrics::submission_accepted(moment);
    Ok(())
}

/// Alle datoer med minst ett innslag, nyeste først.
pub fn list_available_dates(store: &Store) -> Vec<DateLabel> {
    let set: BTreeSet<&DateLabel> = store
        .players()
        .flat_map(|(_, entries)| entries.iter().map(|e| &e.date))
        .collect();
    let mut dates: Vec<DateLabel> = set.into_iter().cloned().collect();
    dates.sort_by(cmp_descending);
    dates
}

pub fn report_for(
    store: &Store,
    date: &DateLabel,
    roster: &Roster,
    titles: &ReportTitles,
) -> ReportModel {
    let model = build(date, aggregate(store, date, roster), titles);
    metrics::report_built();
    model
}

/// Ferdig eksportert dokument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn require(policy: &dyn AuthorizationPolicy, credential: &str) -> Result<()> {
    if policy.authorize(credential) {
        Ok(())
    } else {
        warn!("stab-operasjon avvist: feil passord");
        Err(CoreError::Unauthorized)
    }
}

/// Fangst- og stab-grensesnittet. Hver operasjon er én hel syklus:
/// last, beregn, (lagre).
///
/// Antar én skriver om gangen; se `writer::StoreWriter` for flere samtidige.
pub struct LoadMonitor<S: DocumentStore> {
    store: S,
    roster: Roster,
    titles: ReportTitles,
}

impl LoadMonitor<JsonFileStore> {
    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(
            JsonFileStore::new(cfg.store_path.clone()),
            cfg.roster.clone(),
            cfg.titles(),
        )
    }
}

impl<S: DocumentStore> LoadMonitor<S> {
    pub fn new(store: S, roster: Roster, titles: ReportTitles) -> Self {
        Self {
            store,
            roster,
            titles,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn submit(&self, record: SubmissionRecord) -> Result<()> {
        let mut store = self.store.load();
        let player = record.player.clone();
        let moment = record.moment;
        let date = record.date.clone();

        apply_submission(&mut store, record, &self.roster)?;
        self.store.save(&store)?;

        info!("lagret {} for {} ({})", moment, player, date);
        Ok(())
    }

    pub fn submit_pre(&self, player: &str, date: &DateLabel, metrics: PreMetrics) -> Result<()> {
        self.submit(SubmissionRecord::pre(player, date.clone(), metrics))
    }

    pub fn submit_post(&self, player: &str, date: &DateLabel, metrics: PostMetrics) -> Result<()> {
        self.submit(SubmissionRecord::post(player, date.clone(), metrics))
    }

    pub fn list_available_dates(&self) -> Vec<DateLabel> {
        list_available_dates(&self.store.load())
    }

    pub fn get_report(
        &self,
        policy: &dyn AuthorizationPolicy,
        credential: &str,
        date: &DateLabel,
    ) -> Result<ReportModel> {
        require(policy, credential)?;
        Ok(report_for(&self.store.load(), date, &self.roster, &self.titles))
    }

    /// Renderfeil fanges her og returneres som `CoreError::Render`;
    /// lageret berøres ikke.
    pub fn export_report(
        &self,
        policy: &dyn AuthorizationPolicy,
        credential: &str,
        date: &DateLabel,
        renderer: &dyn ReportRenderer,
    ) -> Result<Export> {
        let model = self.get_report(policy, credential, date)?;
        let bytes = renderer.render(&model).map_err(|e| {
            warn!("rendering av {} feilet: {}", date, e);
            CoreError::Render(e)
        })?;
        Ok(Export {
            file_name: model.export_file_name(renderer.extension()),
            bytes,
        })
    }

    /// Tømmer hele lageret. Irreversibelt.
    pub fn clear_all(&self, policy: &dyn AuthorizationPolicy, credential: &str) -> Result<()> {
        require(policy, credential)?;
        let mut store = self.store.load();
        let removed = store.record_count();
        store.clear();
        self.store.save(&store)?;
        warn!("lageret er tømt ({} innslag slettet)", removed);
        Ok(())
    }
}
