use squadload_core::metrics::gather_text;
use squadload_core::{
    DateLabel, DocumentStore, LoadMonitor, MemoryStore, PreMetrics, ReportTitles, Roster,
    SharedSecretPolicy,
};

#[test]
fn smoke_counters_show_up_in_exposition() {
    let m = LoadMonitor::new(MemoryStore::new(), Roster::default(), ReportTitles::default());
    let date = DateLabel::new("Lunes 3 de Noviembre");
    let pre = PreMetrics {
        rest_quality: 7,
        stress: 2,
        muscular_fatigue: 0,
    };

    m.submit_pre("David Gonzalez Rozas", &date, pre).expect("første");
    assert!(m.submit_pre("David Gonzalez Rozas", &date, pre).is_err());

    let policy = SharedSecretPolicy::from_secret("cuerpo-tecnico");
    m.get_report(&policy, "cuerpo-tecnico", &date).expect("rapport");

    assert!(MemoryStore::from_document("[1, 2]").load().is_empty());

    let text = gather_text();
    assert!(text.contains(r#"squadload_submissions_accepted_total{moment="PRE"}"#));
    assert!(text.contains(r#"squadload_submissions_rejected_total{reason="duplicate_submission"}"#));
    assert!(text.contains("squadload_reports_built_total"));
    assert!(text.contains("squadload_store_fail_open_total"));
}
