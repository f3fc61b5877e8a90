use squadload_core::error::RenderError;
use squadload_core::{
    CoreError, DateLabel, DenyAll, DocumentStore, JsonFileStore, LoadMonitor, MemoryStore,
    PostMetrics, PreMetrics, RejectionReason, ReportModel, ReportRenderer, ReportTitles, Roster,
    Severity, SharedSecretPolicy, TextRenderer,
};

const DAVID: &str = "David Gonzalez Rozas";
const SECRET: &str = "cuerpo-tecnico";

fn monitor() -> LoadMonitor<MemoryStore> {
    LoadMonitor::new(MemoryStore::new(), Roster::default(), ReportTitles::default())
}

fn pre(rest: i32, stress: i32, fatigue: i32) -> PreMetrics {
    PreMetrics {
        rest_quality: rest,
        stress,
        muscular_fatigue: fatigue,
    }
}

fn post(intensity: i32, fatigue: i32) -> PostMetrics {
    PostMetrics {
        perceived_intensity: intensity,
        current_fatigue: fatigue,
    }
}

#[test]
fn scenario_pre_then_post_gives_high_fatigue_row() {
    let m = monitor();
    let date = DateLabel::new("Monday 3 de Noviembre");
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).expect("pre");
    m.submit_post(DAVID, &date, post(8, 9)).expect("post");

    let policy = SharedSecretPolicy::from_secret(SECRET);
    let report = m.get_report(&policy, SECRET, &date).expect("report");
    let row = &report.rows[0];
    assert_eq!(row.player, DAVID);
    assert_eq!(row.pre, Some(pre(7, 2, 0)));
    assert_eq!(row.post, Some(post(8, 9)));
    assert_eq!(row.fatigue_level, 9);
    assert_eq!(row.band, Severity::High);
}

#[test]
fn second_submission_is_duplicate_and_store_unchanged() {
    let m = monitor();
    let date = DateLabel::new("Lunes 3 de Noviembre");
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).expect("første");
    let before = m.backend().document();

    let err = m.submit_pre(DAVID, &date, pre(3, 3, 3)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Rejected(RejectionReason::DuplicateSubmission { .. })
    ));
    assert_eq!(m.backend().document(), before);
    assert_eq!(m.backend().load().record_count(), 1);
}

#[test]
fn out_of_range_appends_nothing() {
    let m = monitor();
    let date = DateLabel::new("Lunes 3 de Noviembre");
    let err = m.submit_post(DAVID, &date, post(11, 2)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Rejected(RejectionReason::OutOfRangeMetric { value: 11, .. })
    ));
    assert!(m.backend().document().is_none());
    assert!(m.list_available_dates().is_empty());
}

#[test]
fn dates_are_distinct_and_newest_first() {
    let m = monitor();
    m.submit_pre(DAVID, &"Lunes 3 de Noviembre".into(), pre(7, 2, 0)).unwrap();
    m.submit_post(DAVID, &"Lunes 3 de Noviembre".into(), post(5, 5)).unwrap();
    m.submit_pre("Igor Sava", &"Martes 28 de Octubre".into(), pre(7, 2, 0)).unwrap();
    m.submit_pre("Igor Sava", &"Jueves 13 de Noviembre".into(), pre(7, 2, 0)).unwrap();

    let dates: Vec<String> = m.list_available_dates().iter().map(|d| d.to_string()).collect();
    assert_eq!(
        dates,
        vec![
            "Jueves 13 de Noviembre",
            "Lunes 3 de Noviembre",
            "Martes 28 de Octubre"
        ]
    );
}

#[test]
fn report_for_empty_date_lists_whole_roster_without_data() {
    let m = monitor();
    let policy = SharedSecretPolicy::from_secret(SECRET);
    let report = m
        .get_report(&policy, SECRET, &DateLabel::new("Domingo 9 de Noviembre"))
        .unwrap();
    assert_eq!(report.rows.len(), 4);
    assert!(report.rows.iter().all(|r| !r.has_data() && r.fatigue_level == 0));
}

#[test]
fn staff_operations_require_authorization() {
    let m = monitor();
    let date = DateLabel::new("Lunes 3 de Noviembre");
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).unwrap();

    let policy = SharedSecretPolicy::from_secret(SECRET);
    assert!(matches!(
        m.get_report(&policy, "123456", &date),
        Err(CoreError::Unauthorized)
    ));
    assert!(matches!(
        m.get_report(&DenyAll, SECRET, &date),
        Err(CoreError::Unauthorized)
    ));
    assert!(matches!(m.clear_all(&policy, "feil"), Err(CoreError::Unauthorized)));
    assert_eq!(m.backend().load().record_count(), 1);
}

#[test]
fn clear_all_empties_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("seguimiento_futbol.json");
    let m = LoadMonitor::new(
        JsonFileStore::new(&path),
        Roster::default(),
        ReportTitles::default(),
    );
    let date = DateLabel::new("Lunes 3 de Noviembre");
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).unwrap();
    m.submit_post("Igor Sava", &date, post(6, 6)).unwrap();
    assert_eq!(m.list_available_dates().len(), 1);

    let policy = SharedSecretPolicy::from_secret(SECRET);
    m.clear_all(&policy, SECRET).expect("clear");

    assert!(m.list_available_dates().is_empty());
    assert!(JsonFileStore::new(&path).load().is_empty());

    // etter tømming kan samme nøkkel sendes inn igjen
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).expect("ny innsending");
}

struct BrokenRenderer;

impl ReportRenderer for BrokenRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, _model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Other("font mangler".into()))
    }
}

#[test]
fn render_failure_is_surfaced_and_store_untouched() {
    let m = monitor();
    let date = DateLabel::new("Lunes 3 de Noviembre");
    m.submit_pre(DAVID, &date, pre(7, 2, 0)).unwrap();
    let before = m.backend().document();

    let policy = SharedSecretPolicy::from_secret(SECRET);
    let err = m
        .export_report(&policy, SECRET, &date, &BrokenRenderer)
        .unwrap_err();
    assert!(matches!(err, CoreError::Render(_)));
    assert!(err.to_string().contains("font mangler"));
    assert_eq!(m.backend().document(), before);

    // og en fungerende renderer gir eksportnavn + innhold
    let ok = m
        .export_report(&policy, SECRET, &date, &TextRenderer::default())
        .unwrap();
    assert_eq!(ok.file_name, "Informe_LeganesC_Lunes_3_de_Noviembre.txt");
    assert!(!ok.bytes.is_empty());
}
