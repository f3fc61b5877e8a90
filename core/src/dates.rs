use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const DIAS: [&str; 7] = [
    "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo",
];

const MESES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

// Engelske navn aksepteres ved sortering (eldre etiketter)
const MONTHS_EN: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Kalenderdag-etikett ("Lunes 3 de Noviembre") – nøkkelen for én treningsøkt.
/// Ikke et tidsstempel: to innsendinger samme dag kolliderer alltid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateLabel(String);

impl DateLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Dagens etikett i lokal tid.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let dia = DIAS[weekday_index(date.weekday())];
        let mes = MESES[date.month0() as usize];
        Self(format!("{} {} de {}", dia, date.day(), mes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// (måned, dag) hvis etiketten kan tolkes. Året finnes ikke i etiketten.
    pub fn month_day(&self) -> Option<(u32, u32)> {
        let mut day = None;
        let mut month = None;
        for token in self.0.split_whitespace() {
            if day.is_none() {
                if let Ok(d) = token.parse::<u32>() {
                    if (1..=31).contains(&d) {
                        day = Some(d);
                        continue;
                    }
                }
            }
            if let Some(m) = month_from_name(token) {
                month = Some(m);
            }
        }
        Some((month?, day?))
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DateLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DateLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

fn weekday_index(w: Weekday) -> usize {
    w.num_days_from_monday() as usize
}

fn month_from_name(token: &str) -> Option<u32> {
    let t = token.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
    if t.is_empty() {
        return None;
    }
    MESES
        .iter()
        .position(|m| m.to_lowercase() == t)
        .or_else(|| MONTHS_EN.iter().position(|m| *m == t))
        .or_else(|| (t == "setiembre").then_some(8))
        .map(|i| i as u32 + 1)
}

/// Synkende rekkefølge: tolkbare etiketter etter (måned, dag), deretter resten
/// synkende som tekst.
pub fn cmp_descending(a: &DateLabel, b: &DateLabel) -> Ordering {
    match (a.month_day(), b.month_day()) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| b.0.cmp(&a.0)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.0.cmp(&a.0),
    }
}
