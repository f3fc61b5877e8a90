use std::sync::Arc;
use std::thread;

use squadload_core::models::DEFAULT_ROSTER;
use squadload_core::{
    CoreError, DateLabel, DocumentStore, MemoryStore, PostMetrics, PreMetrics, RejectionReason,
    ReportTitles, Roster, SharedSecretPolicy, StoreWriter,
};

const SECRET: &str = "cuerpo-tecnico";

fn pre(fatigue: i32) -> PreMetrics {
    PreMetrics {
        rest_quality: 7,
        stress: 2,
        muscular_fatigue: fatigue,
    }
}

#[test]
fn concurrent_submissions_are_not_lost() {
    let backend = Arc::new(MemoryStore::new());
    let writer = StoreWriter::spawn(backend.clone(), Roster::default(), ReportTitles::default())
        .expect("spawn");

    // 4 spillere x 5 datoer, PRE og POST, fra hver sin tråd
    let mut threads = Vec::new();
    for player in DEFAULT_ROSTER {
        let h = writer.handle();
        threads.push(thread::spawn(move || {
            for day in 1..=5 {
                let date = DateLabel::new(format!("Lunes {} de Noviembre", day));
                h.submit_pre(player, &date, pre(day)).expect("pre");
                h.submit_post(
                    player,
                    &date,
                    PostMetrics {
                        perceived_intensity: 6,
                        current_fatigue: day,
                    },
                )
                .expect("post");
            }
        }));
    }
    for t in threads {
        t.join().expect("join");
    }

    let snapshot = writer.handle().snapshot().expect("snapshot");
    assert_eq!(snapshot.record_count(), 40);
    assert_eq!(backend.load().record_count(), 40);
    assert_eq!(writer.handle().list_available_dates().unwrap().len(), 5);
}

#[test]
fn racing_duplicates_admit_exactly_one() {
    let backend = Arc::new(MemoryStore::new());
    let writer = StoreWriter::spawn(backend.clone(), Roster::default(), ReportTitles::default())
        .expect("spawn");
    let date = DateLabel::new("Lunes 3 de Noviembre");

    let mut threads = Vec::new();
    for _ in 0..8 {
        let h = writer.handle();
        let date = date.clone();
        threads.push(thread::spawn(move || {
            h.submit_pre("Igor Sava", &date, pre(4))
        }));
    }
    let results: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(CoreError::Rejected(RejectionReason::DuplicateSubmission { .. }))
    )));
    assert_eq!(backend.load().record_count(), 1);
}

#[test]
fn report_and_clear_through_handle() {
    let backend = Arc::new(MemoryStore::new());
    let writer = StoreWriter::spawn(backend.clone(), Roster::default(), ReportTitles::default())
        .expect("spawn");
    let h = writer.handle();
    let date = DateLabel::new("Lunes 3 de Noviembre");
    h.submit_pre("Marco Lopez Dato", &date, pre(6)).unwrap();

    let policy = SharedSecretPolicy::from_secret(SECRET);
    let report = h.get_report(&policy, SECRET, &date).unwrap();
    assert_eq!(report.rows[2].fatigue_level, 6);

    assert!(matches!(h.clear_all(&policy, "nope"), Err(CoreError::Unauthorized)));
    assert_eq!(h.clear_all(&policy, SECRET).unwrap(), 1);
    assert!(h.snapshot().unwrap().is_empty());
}

#[test]
fn handle_reports_unavailable_after_writer_stops() {
    let writer = StoreWriter::spawn(MemoryStore::new(), Roster::default(), ReportTitles::default())
        .expect("spawn");
    let h = writer.handle();
    drop(writer);

    assert!(matches!(h.snapshot(), Err(CoreError::WriterUnavailable)));
}
