use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::auth::{AuthorizationPolicy, DenyAll, SharedSecretPolicy};
use crate::error::ConfigError;
use crate::models::Roster;
use crate::report::ReportTitles;

/// Miljøvariabel med stab-passordet i klartekst (hashes ved oppstart).
pub const STAFF_SECRET_ENV: &str = "SQUADLOAD_STAFF_SECRET";

pub const DEFAULT_STORE_PATH: &str = "seguimiento_futbol.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub store_path: PathBuf,
    pub roster: Roster,
    pub organization: String,
    pub subtitle: String,
    pub export_prefix: String,
    /// SHA-256 (hex) av stab-passordet.
    pub staff_secret_sha256: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let titles = ReportTitles::default();
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            roster: Roster::default(),
            organization: titles.organization,
            subtitle: titles.subtitle,
            export_prefix: titles.export_prefix,
            staff_secret_sha256: None,
        }
    }
}

impl MonitorConfig {
    pub fn titles(&self) -> ReportTitles {
        ReportTitles {
            organization: self.organization.clone(),
            subtitle: self.subtitle.clone(),
            export_prefix: self.export_prefix.clone(),
        }
    }

    /// Miljøvariabel først, deretter konfigurert digest, ellers avvis alt.
    pub fn authorization_policy(&self) -> Box<dyn AuthorizationPolicy> {
        if let Ok(secret) = std::env::var(STAFF_SECRET_ENV) {
            if !secret.is_empty() {
                return Box::new(SharedSecretPolicy::from_secret(&secret));
            }
        }
        match self.staff_secret_sha256.as_deref() {
            Some(hex) => match SharedSecretPolicy::from_hex_digest(hex) {
                Some(p) => Box::new(p),
                None => {
                    warn!("staff_secret_sha256 er ikke en gyldig SHA-256 hex; stab-tilgang er stengt");
                    Box::new(DenyAll)
                }
            },
            None => {
                warn!("ingen stab-hemmelighet konfigurert; stab-tilgang er stengt");
                Box::new(DenyAll)
            }
        }
    }
}

/// Leser konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        info!("fant ikke konfig på {}, bruker default", path.display());
        return Ok(MonitorConfig::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let cfg: MonitorConfig = spte::deserialize(de).map_err(|e| ConfigError::Parse {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })?;
    info!(
        "konfig lastet fra {} ({} spillere, lager={})",
        path.display(),
        cfg.roster.len(),
        cfg.store_path.display()
    );
    Ok(cfg)
}
