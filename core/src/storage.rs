use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_path_to_error as spte;

use crate::dates::DateLabel;
use crate::error::StoreError;
use crate::metrics;
use crate::models::{Metrics, PostMetrics, PreMetrics, SessionEntry, SessionMoment, Store};
use crate::validation::check_range;

// ──────────────────────────────────────────────────────────────────────────────
// WIRE-FORMAT: { "<spiller>": [ { "fecha", "momento", "datos" } ] }
// Tolerant ved lesing (aliaser i prioritert rekkefølge), kanonisk ved skriving.
// ──────────────────────────────────────────────────────────────────────────────

type RawDocument = BTreeMap<String, Vec<Value>>;

// Første nøkkel som finnes vinner. "sueno" er eldre navn på "descanso".
const DATE_KEYS: &[&str] = &["fecha", "date"];
const MOMENT_KEYS: &[&str] = &["momento", "moment"];
const DATA_KEYS: &[&str] = &["datos", "data"];
const REST_KEYS: &[&str] = &["descanso", "sueno", "rest", "restQuality", "rest_quality", "sleep"];
const STRESS_KEYS: &[&str] = &["estres", "stress"];
const FATIGUE_KEYS: &[&str] = &["fatiga", "muscularFatigue", "muscular_fatigue"];
const INTENSITY_KEYS: &[&str] = &["intensidad", "perceivedIntensity", "perceived_intensity"];
const CURRENT_FATIGUE_KEYS: &[&str] = &["fatiga_actual", "currentFatigue", "current_fatigue"];

#[derive(Debug, Serialize)]
struct WireEntry {
    fecha: String,
    momento: String,
    datos: Value,
}

#[derive(Debug, Serialize)]
struct PreWire {
    descanso: i32,
    estres: i32,
    fatiga: i32,
}

#[derive(Debug, Serialize)]
struct PostWire {
    intensidad: i32,
    fatiga_actual: i32,
}

impl From<&PreMetrics> for PreWire {
    fn from(p: &PreMetrics) -> Self {
        PreWire {
            descanso: p.rest_quality,
            estres: p.stress,
            fatiga: p.muscular_fatigue,
        }
    }
}

impl From<&PostMetrics> for PostWire {
    fn from(p: &PostMetrics) -> Self {
        PostWire {
            intensidad: p.perceived_intensity,
            fatiga_actual: p.current_fatigue,
        }
    }
}

fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
}

fn field<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<Option<T>, String> {
    match pick(obj, keys) {
        None => Ok(None),
        Some((key, v)) => Deserialize::deserialize(v)
            .map(Some)
            .map_err(|e| format!("{}: {}", key, e)),
    }
}

fn required<T: DeserializeOwned>(obj: &Map<String, Value>, keys: &[&'static str]) -> Result<T, String> {
    field(obj, keys)?.ok_or_else(|| format!("mangler '{}'", keys[0]))
}

/// Normaliser ett innslag. Feil => kalleren beholder innslaget rått.
fn normalize_entry(raw: &Value) -> Result<SessionEntry, String> {
    let obj = raw
        .as_object()
        .ok_or_else(|| "innslaget er ikke et objekt".to_string())?;
    let fecha: String = required(obj, DATE_KEYS)?;
    let momento: String = required(obj, MOMENT_KEYS)?;
    let moment =
        SessionMoment::parse(&momento).ok_or_else(|| format!("ukjent momento '{}'", momento))?;
    let datos = pick(obj, DATA_KEYS)
        .and_then(|(_, v)| v.as_object())
        .ok_or_else(|| "datos mangler eller er ikke et objekt".to_string())?;

    let metrics = match moment {
        SessionMoment::Pre => Metrics::Pre(PreMetrics {
            // manglende hvile-felt tolkes som 0
            rest_quality: field(datos, REST_KEYS)?.unwrap_or(0),
            stress: required(datos, STRESS_KEYS)?,
            muscular_fatigue: required(datos, FATIGUE_KEYS)?,
        }),
        SessionMoment::Post => Metrics::Post(PostMetrics {
            perceived_intensity: required(datos, INTENSITY_KEYS)?,
            current_fatigue: required(datos, CURRENT_FATIGUE_KEYS)?,
        }),
    };

    check_range(&metrics).map_err(|e| e.to_string())?;

    Ok(SessionEntry {
        date: DateLabel::new(fecha),
        metrics,
    })
}

/// Dekod et helt dokument. Innslag som ikke kan tolkes holdes utenfor
/// rapportene, men beholdes i lageret og skrives tilbake uendret.
/// Kun et dokument som ikke kan parses i det hele tatt gir feil.
pub fn decode_document(contents: &str) -> Result<Store, spte::Error<serde_json::Error>> {
    let de = &mut serde_json::Deserializer::from_str(contents);
    let doc: RawDocument = spte::deserialize(de)?;

    let mut store = Store::new();
    for (player, entries) in doc {
        for (i, raw) in entries.into_iter().enumerate() {
            match normalize_entry(&raw) {
                Ok(entry) => store.append(&player, entry),
                Err(reason) => {
                    warn!("kan ikke tolke innslag {}[{}]: {} (beholdes uendret)", player, i, reason);
                    store.keep_unreadable(&player, i, raw);
                }
            }
        }
    }
    Ok(store)
}

fn encode_entry(e: &SessionEntry) -> Result<Value, serde_json::Error> {
    let datos = match &e.metrics {
        Metrics::Pre(p) => serde_json::to_value(PreWire::from(p))?,
        Metrics::Post(p) => serde_json::to_value(PostWire::from(p))?,
    };
    serde_json::to_value(WireEntry {
        fecha: e.date.to_string(),
        momento: e.moment().to_string(),
        datos,
    })
}

pub fn encode_document(store: &Store) -> Result<String, serde_json::Error> {
    let names: BTreeSet<&str> = store
        .players()
        .map(|(p, _)| p)
        .chain(store.unreadable_players())
        .collect();

    let mut doc: RawDocument = BTreeMap::new();
    for player in names {
        let mut out: Vec<Value> = Vec::new();
        let mut raw = store.unreadable(player).iter().peekable();
        let mut decoded = store.entries(player).iter();
        // uleselige innslag tilbake på sin opprinnelige plass
        loop {
            if let Some((pos, v)) = raw.peek() {
                if *pos <= out.len() {
                    out.push(v.clone());
                    raw.next();
                    continue;
                }
            }
            match decoded.next() {
                Some(e) => out.push(encode_entry(e)?),
                None => break,
            }
        }
        out.extend(raw.map(|(_, v)| v.clone()));
        doc.insert(player.to_string(), out);
    }
    serde_json::to_string_pretty(&doc)
}

/// Leser hele lageret fra disk (JSON).
/// Mangler filen, eller er den korrupt, returneres et tomt lager (fail-open).
pub fn load_store(path: impl AsRef<Path>) -> Store {
    let path = path.as_ref();
    if !path.exists() {
        info!("fant ikke {}, starter med tomt lager", path.display());
        return Store::new();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("kunne ikke lese {}: {} (tomt lager)", path.display(), e);
            metrics::store_fail_open();
            return Store::new();
        }
    };

    match decode_document(&contents) {
        Ok(store) => {
            info!(
                "lager lastet fra {} ({} innslag)",
                path.display(),
                store.record_count()
            );
            store
        }
        Err(e) => {
            warn!(
                "korrupt lager {} ved '{}': {} (tomt lager)",
                path.display(),
                e.path(),
                e.inner()
            );
            metrics::store_fail_open();
            Store::new()
        }
    }
}

/// Lagrer hele lageret (pretty JSON) via temp-fil + rename,
/// slik at ingen leser ser et halvskrevet dokument.
pub fn save_store(store: &Store, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = encode_document(store)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        if let Err(rm) = std::fs::remove_file(&tmp) {
            warn!("kunne ikke fjerne {}: {}", tmp.display(), rm);
        }
        return Err(e.into());
    }
    info!(
        "lager skrevet til {} ({} innslag)",
        path.display(),
        store.record_count()
    );
    Ok(())
}

/// Abstrakt dokumentlager: hele snapshot inn, hele snapshot ut.
pub trait DocumentStore: Send {
    fn load(&self) -> Store;
    fn save(&self, store: &Store) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Store {
        load_store(&self.path)
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        save_store(store, &self.path)
    }
}

/// Lager i minnet. Holder det serialiserte dokumentet, så samme
/// dekod/enkod-vei brukes som for fil.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: impl Into<String>) -> Self {
        Self {
            doc: Mutex::new(Some(doc.into())),
        }
    }

    pub fn document(&self) -> Option<String> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Store {
        let guard = self.doc.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_deref() {
            None => Store::new(),
            Some(doc) => decode_document(doc).unwrap_or_else(|e| {
                warn!("korrupt minnelager ved '{}': {} (tomt lager)", e.path(), e.inner());
                metrics::store_fail_open();
                Store::new()
            }),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        let json = encode_document(store)?;
        *self.doc.lock().unwrap_or_else(|e| e.into_inner()) = Some(json);
        Ok(())
    }
}

impl<T: DocumentStore + Sync> DocumentStore for std::sync::Arc<T> {
    fn load(&self) -> Store {
        (**self).load()
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        (**self).save(store)
    }
}
