use serde::{Deserialize, Serialize};

use crate::aggregate::PlayerRow;
use crate::dates::DateLabel;
use crate::models::short_name;
use crate::severity::Severity;

/// Faste titler for rapporthodet og eksportnavn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTitles {
    pub organization: String,
    pub subtitle: String,
    pub export_prefix: String,
}

impl Default for ReportTitles {
    fn default() -> Self {
        Self {
            organization: "C.D. LEGANES C".to_string(),
            subtitle: "INFORME OFICIAL DE CONTROL DE CARGA".to_string(),
            export_prefix: "Informe_LeganesC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub organization: String,
    pub subtitle: String,
    pub date: DateLabel,
}

/// Ett søylepunkt i fatigue-grafen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub fatigue_level: i32,
    pub band: Severity,
}

/// Én verdi i tabellen. `band` er None for felter uten utheving (hvile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricCell {
    pub label: &'static str,
    pub value: i32,
    pub band: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub header: ReportHeader,
    pub rows: Vec<PlayerRow>,
    pub chart: Vec<ChartPoint>,
    #[serde(skip)]
    export_prefix: String,
}

impl ReportModel {
    pub fn date(&self) -> &DateLabel {
        &self.header.date
    }

    /// Samme rekkefølge som `rows`.
    pub fn chart_series(&self) -> &[ChartPoint] {
        &self.chart
    }

    /// "Informe_LeganesC_Lunes_3_de_Noviembre.pdf"
    pub fn export_file_name(&self, ext: &str) -> String {
        let date = self.header.date.as_str().replace(' ', "_");
        format!("{}_{}.{}", self.export_prefix, date, ext.trim_start_matches('.'))
    }
}

impl PlayerRow {
    /// PRE-celler, eller None ("Sin respuesta").
    pub fn pre_cells(&self) -> Option<Vec<MetricCell>> {
        self.pre.map(|p| {
            vec![
                MetricCell { label: "Descanso", value: p.rest_quality, band: None },
                emphasized("Estres", p.stress),
                emphasized("Fatiga", p.muscular_fatigue),
            ]
        })
    }

    /// POST-celler, eller None ("Sin respuesta").
    pub fn post_cells(&self) -> Option<Vec<MetricCell>> {
        self.post.map(|p| {
            vec![
                emphasized("Intensidad", p.perceived_intensity),
                emphasized("Fatiga", p.current_fatigue),
            ]
        })
    }
}

fn emphasized(label: &'static str, value: i32) -> MetricCell {
    MetricCell {
        label,
        value,
        band: Some(Severity::classify_clamped(value)),
    }
}

/// Ren projeksjon fra aggregerte rader til rendererens form. Ingen IO.
pub fn build(date: &DateLabel, rows: Vec<PlayerRow>, titles: &ReportTitles) -> ReportModel {
    let chart = rows
        .iter()
        .map(|r| ChartPoint {
            label: short_name(&r.player).to_string(),
            fatigue_level: r.fatigue_level,
            band: r.band,
        })
        .collect();

    ReportModel {
        header: ReportHeader {
            organization: titles.organization.clone(),
            subtitle: titles.subtitle.clone(),
            date: date.clone(),
        },
        rows,
        chart,
        export_prefix: titles.export_prefix.clone(),
    }
}
