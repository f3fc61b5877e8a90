use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::models::SessionMoment;

pub struct Metrics {
    pub registry: Registry,
    pub submissions_accepted: IntCounterVec,
    pub submissions_rejected: IntCounterVec,
    pub reports_built: IntCounter,
    pub store_fail_open: IntCounter,
}

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions_accepted = IntCounterVec::new(
            Opts::new(
                "squadload_submissions_accepted_total",
                "Innsendinger lagret, per moment",
            ),
            &["moment"],
        )?;
        let submissions_rejected = IntCounterVec::new(
            Opts::new(
                "squadload_submissions_rejected_total",
                "Innsendinger avvist, per grunn",
            ),
            &["reason"],
        )?;
        let reports_built = IntCounter::new(
            "squadload_reports_built_total",
            "Rapportmodeller bygget",
        )?;
        let store_fail_open = IntCounter::new(
            "squadload_store_fail_open_total",
            "Lager-lesinger som falt tilbake til tomt lager",
        )?;

        registry.register(Box::new(submissions_accepted.clone()))?;
        registry.register(Box::new(submissions_rejected.clone()))?;
        registry.register(Box::new(reports_built.clone()))?;
        registry.register(Box::new(store_fail_open.clone()))?;

        Ok(Self {
            registry,
            submissions_accepted,
            submissions_rejected,
            reports_built,
            store_fail_open,
        })
    }
}

// Navn og hjelpetekster er faste; registreringen kan bare feile ved duplikater.
static METRICS: Lazy<Option<Metrics>> = Lazy::new(|| match Metrics::new() {
    Ok(m) => Some(m),
    Err(e) => {
        log::error!("kunne ikke registrere metrics: {}", e);
        None
    }
});

pub fn global() -> Option<&'static Metrics> {
    METRICS.as_ref()
}

pub fn submission_accepted(moment: SessionMoment) {
    if let Some(m) = global() {
        m.submissions_accepted
            .with_label_values(&[moment.as_str()])
            .inc();
    }
}

pub fn submission_rejected(reason: &str) {
    if let Some(m) = global() {
        m.submissions_rejected.with_label_values(&[reason]).inc();
    }
}

pub fn report_built() {
    if let Some(m) = global() {
        m.reports_built.inc();
    }
}

pub fn store_fail_open() {
    if let Some(m) = global() {
        m.store_fail_open.inc();
    }
}

/// Tekstformat (Prometheus exposition).
pub fn gather_text() -> String {
    let Some(m) = global() else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&m.registry.gather(), &mut buf) {
        log::warn!("kunne ikke enkode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
