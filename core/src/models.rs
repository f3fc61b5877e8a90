use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::DateLabel;

/// Standardtroppen, i rekkefølgen rapporten skal vise dem.
pub const DEFAULT_ROSTER: [&str; 4] = [
    "David Gonzalez Rozas",
    "Jaime Catalina Contreras",
    "Marco Lopez Dato",
    "Igor Sava",
];

/// Fast, lukket tropp. Rekkefølgen er signifikant (radrekkefølge i rapporten).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn new<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for p in players {
            let p = p.into();
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Self(out)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.0.iter().any(|p| p == player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Roster {
    fn from(players: Vec<String>) -> Self {
        Self::new(players)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER)
    }
}

/// Første ord i navnet ("David Gonzalez Rozas" -> "David").
pub fn short_name(player: &str) -> &str {
    player.split_whitespace().next().unwrap_or(player)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionMoment {
    Pre,
    Post,
}

impl SessionMoment {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMoment::Pre => "PRE",
            SessionMoment::Post => "POST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRE" => Some(SessionMoment::Pre),
            "POST" => Some(SessionMoment::Post),
            _ => None,
        }
    }
}

impl fmt::Display for SessionMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Før økt: hvile, stress og muskulær tretthet (0–10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreMetrics {
    pub rest_quality: i32,
    pub stress: i32,
    pub muscular_fatigue: i32,
}

/// Etter økt: opplevd intensitet (RPE) og nåværende tretthet (0–10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub perceived_intensity: i32,
    pub current_fatigue: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "UPPERCASE")]
pub enum Metrics {
    Pre(PreMetrics),
    Post(PostMetrics),
}

impl Metrics {
    pub fn moment(&self) -> SessionMoment {
        match self {
            Metrics::Pre(_) => SessionMoment::Pre,
            Metrics::Post(_) => SessionMoment::Post,
        }
    }

    /// Alle numeriske felter med navn, i visningsrekkefølge.
    pub fn fields(&self) -> Vec<(&'static str, i32)> {
        match self {
            Metrics::Pre(p) => vec![
                ("rest_quality", p.rest_quality),
                ("stress", p.stress),
                ("muscular_fatigue", p.muscular_fatigue),
            ],
            Metrics::Post(p) => vec![
                ("perceived_intensity", p.perceived_intensity),
                ("current_fatigue", p.current_fatigue),
            ],
        }
    }
}

impl From<PreMetrics> for Metrics {
    fn from(p: PreMetrics) -> Self {
        Metrics::Pre(p)
    }
}

impl From<PostMetrics> for Metrics {
    fn from(p: PostMetrics) -> Self {
        Metrics::Post(p)
    }
}

/// Én innsending slik den kommer fra skjemaet. Moment og metrikker holdes
/// separat slik at en mismatch kan avvises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub player: String,
    pub date: DateLabel,
    pub moment: SessionMoment,
    pub metrics: Metrics,
}

impl SubmissionRecord {
    pub fn pre(player: impl Into<String>, date: impl Into<DateLabel>, metrics: PreMetrics) -> Self {
        Self {
            player: player.into(),
            date: date.into(),
            moment: SessionMoment::Pre,
            metrics: Metrics::Pre(metrics),
        }
    }

    pub fn post(player: impl Into<String>, date: impl Into<DateLabel>, metrics: PostMetrics) -> Self {
        Self {
            player: player.into(),
            date: date.into(),
            moment: SessionMoment::Post,
            metrics: Metrics::Post(metrics),
        }
    }
}

/// Lagret innslag for én spiller. Momentet følger av metrikk-varianten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub date: DateLabel,
    pub metrics: Metrics,
}

impl SessionEntry {
    pub fn moment(&self) -> SessionMoment {
        self.metrics.moment()
    }
}

/// Spiller -> innslag i innsendingsrekkefølge (ikke sortert på dato).
///
/// Lagrede innslag som ikke kan tolkes holdes i `unreadable` med sin
/// opprinnelige posisjon, og skrives tilbake uendret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    players: BTreeMap<String, Vec<SessionEntry>>,
    unreadable: BTreeMap<String, Vec<(usize, Value)>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, player: &str) -> &[SessionEntry] {
        self.players.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append-only: eksisterende innslag endres aldri.
    pub fn append(&mut self, player: &str, entry: SessionEntry) {
        self.players.entry(player.to_string()).or_default().push(entry);
    }

    pub fn contains(&self, player: &str, date: &DateLabel, moment: SessionMoment) -> bool {
        self.entries(player)
            .iter()
            .any(|e| &e.date == date && e.moment() == moment)
    }

    pub fn players(&self) -> impl Iterator<Item = (&str, &[SessionEntry])> {
        self.players.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Behold et uleselig innslag slik det står, på plass `position`
    /// i spillerens liste.
    pub fn keep_unreadable(&mut self, player: &str, position: usize, raw: Value) {
        self.unreadable
            .entry(player.to_string())
            .or_default()
            .push((position, raw));
    }

    pub fn unreadable(&self, player: &str) -> &[(usize, Value)] {
        self.unreadable
            .get(player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unreadable_players(&self) -> impl Iterator<Item = &str> {
        self.unreadable.keys().map(String::as_str)
    }

    pub fn unreadable_count(&self) -> usize {
        self.unreadable.values().map(Vec::len).sum()
    }

    /// Antall tolkede innslag (uleselige telles ikke).
    pub fn record_count(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0 && self.unreadable.is_empty()
    }

    /// Fjerner alt, også uleselige innslag.
    pub fn clear(&mut self) {
        self.players.clear();
        self.unreadable.clear();
    }
}
