use std::io::Write;

use crate::error::RenderError;
use crate::report::{MetricCell, ReportModel};
use crate::severity::Severity;

pub const NO_DATA: &str = "Sin respuesta";

/// Grensesnitt mot dokument-/bilde-rendering. Rendering endrer aldri lageret,
/// så en feil her kan alltid prøves på nytt.
pub trait ReportRenderer {
    /// Filendelse for eksport ("txt", "csv", ...).
    fn extension(&self) -> &'static str;

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError>;
}

/// Tabell + søylediagram som ren tekst.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub bar_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { bar_width: 20 }
    }
}

fn mark(band: Option<Severity>) -> &'static str {
    match band {
        Some(Severity::Medium) => "*",
        Some(Severity::High) => "!",
        _ => "",
    }
}

fn cells_text(cells: Option<Vec<MetricCell>>) -> String {
    match cells {
        None => NO_DATA.to_string(),
        Some(cells) => cells
            .iter()
            .map(|c| format!("{}: {}{}", c.label, c.value, mark(c.band)))
            .collect::<Vec<_>>()
            .join("  "),
    }
}

impl ReportRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::new();
        let h = &model.header;

        writeln!(out, "{}", h.organization)?;
        writeln!(out, "{}", h.subtitle)?;
        writeln!(out, "Sesion correspondiente al {}", h.date)?;
        writeln!(out, "{}", "-".repeat(72))?;

        let name_w = model
            .rows
            .iter()
            .map(|r| r.player.chars().count())
            .max()
            .unwrap_or(0)
            .max("JUGADOR".len());

        writeln!(
            out,
            "{:<name_w$} | {:<34} | {}",
            "JUGADOR", "DATOS PRE-ENTRENO", "DATOS POST-ENTRENO"
        )?;
        for row in &model.rows {
            writeln!(
                out,
                "{:<name_w$} | {:<34} | {}",
                row.player,
                cells_text(row.pre_cells()),
                cells_text(row.post_cells())
            )?;
        }

        writeln!(out)?;
        writeln!(out, "MAPA DE FATIGA ACUMULADA POR JUGADOR (0-10)")?;
        let label_w = model
            .chart_series()
            .iter()
            .map(|p| p.label.chars().count())
            .max()
            .unwrap_or(0);
        for p in model.chart_series() {
            let filled = (p.fatigue_level.clamp(0, 10) as usize * self.bar_width) / 10;
            writeln!(
                out,
                "{:<label_w$} |{:<bar$}| {}{}",
                p.label,
                "#".repeat(filled),
                p.fatigue_level,
                mark(Some(p.band)),
                bar = self.bar_width
            )?;
        }

        Ok(out)
    }
}

/// Én CSV-rad per spiller i troppen; tomme felter når data mangler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        let mut w = csv::Writer::from_writer(Vec::new());
        w.write_record([
            "fecha",
            "jugador",
            "descanso",
            "estres",
            "fatiga_pre",
            "intensidad",
            "fatiga_post",
            "nivel_fatiga",
            "banda",
        ])?;

        let opt = |v: Option<i32>| v.map(|x| x.to_string()).unwrap_or_default();
        for row in &model.rows {
            w.write_record([
                model.date().to_string(),
                row.player.clone(),
                opt(row.pre.map(|p| p.rest_quality)),
                opt(row.pre.map(|p| p.stress)),
                opt(row.pre.map(|p| p.muscular_fatigue)),
                opt(row.post.map(|p| p.perceived_intensity)),
                opt(row.post.map(|p| p.current_fatigue)),
                row.fatigue_level.to_string(),
                row.band.as_str().to_string(),
            ])?;
        }

        w.into_inner()
            .map_err(|e| RenderError::Other(e.to_string()))
    }
}

/// Rapportmodellen som JSON (for UI-laget).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(model)?)
    }
}
