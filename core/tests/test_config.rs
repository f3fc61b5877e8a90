use std::fs;

use squadload_core::auth::sha256_hex;
use squadload_core::config::{DEFAULT_STORE_PATH, STAFF_SECRET_ENV};
use squadload_core::error::ConfigError;
use squadload_core::{load_config, MonitorConfig, Roster};

#[test]
fn missing_config_gives_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = load_config(dir.path().join("finnes_ikke.json")).expect("default");
    assert_eq!(cfg, MonitorConfig::default());
    assert_eq!(cfg.store_path.to_str(), Some(DEFAULT_STORE_PATH));
    assert_eq!(cfg.roster.len(), 4);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squadload.json");
    fs::write(
        &path,
        r#"{"organization": "C.D. LEGANES B", "store_path": "b.json"}"#,
    )
    .unwrap();

    let cfg = load_config(&path).expect("konfig");
    assert_eq!(cfg.organization, "C.D. LEGANES B");
    assert_eq!(cfg.store_path.to_str(), Some("b.json"));
    assert_eq!(cfg.subtitle, MonitorConfig::default().subtitle);
    assert_eq!(cfg.roster, Roster::default());
    assert!(cfg.staff_secret_sha256.is_none());
}

#[test]
fn bad_config_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squadload.json");
    fs::write(&path, r#"{"roster": "Igor Sava"}"#).unwrap();

    match load_config(&path) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, "roster"),
        other => panic!("forventet Parse-feil, fikk {:?}", other),
    }

    fs::write(&path, "{ \"roster\": [").unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn configured_roster_is_deduplicated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squadload.json");
    fs::write(
        &path,
        r#"{"roster": ["Igor Sava", "Marco Lopez Dato", "Igor Sava"]}"#,
    )
    .unwrap();

    let cfg = load_config(&path).expect("konfig");
    let names: Vec<&str> = cfg.roster.iter().collect();
    assert_eq!(names, vec!["Igor Sava", "Marco Lopez Dato"]);

    // serialiseres fortsatt som en ren liste
    let v = serde_json::to_value(&cfg.roster).unwrap();
    assert_eq!(v, serde_json::json!(["Igor Sava", "Marco Lopez Dato"]));
}

// Eneste test i denne fila som rører miljøvariabelen.
#[test]
fn policy_prefers_env_then_digest_then_deny() {
    std::env::remove_var(STAFF_SECRET_ENV);

    let none = MonitorConfig::default();
    assert!(!none.authorization_policy().authorize(""));
    assert!(!none.authorization_policy().authorize("cuerpo-tecnico"));

    let with_digest = MonitorConfig {
        staff_secret_sha256: Some(sha256_hex("cuerpo-tecnico")),
        ..MonitorConfig::default()
    };
    let policy = with_digest.authorization_policy();
    assert!(policy.authorize("cuerpo-tecnico"));
    assert!(!policy.authorize("123456"));

    let malformed = MonitorConfig {
        staff_secret_sha256: Some("zz-ikke-hex".into()),
        ..MonitorConfig::default()
    };
    assert!(!malformed.authorization_policy().authorize("zz-ikke-hex"));
    assert!(!malformed.authorization_policy().authorize(""));

    std::env::set_var(STAFF_SECRET_ENV, "fra-miljoet");
    let policy = with_digest.authorization_policy();
    assert!(policy.authorize("fra-miljoet"));
    assert!(!policy.authorize("cuerpo-tecnico"));

    // tom variabel teller som ikke satt
    std::env::set_var(STAFF_SECRET_ENV, "");
    assert!(with_digest.authorization_policy().authorize("cuerpo-tecnico"));

    std::env::remove_var(STAFF_SECRET_ENV);
}
