//! squadload – stab-verktøy for registrering og øktrapporter.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use squadload_core::{
    load_config, CoreError, CsvRenderer, DateLabel, JsonRenderer, LoadMonitor, PostMetrics,
    PreMetrics, ReportRenderer, TextRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "squadload")]
#[command(about = "PRE/POST load tracking and session reports")]
#[command(version)]
struct Args {
    /// Konfigfil (JSON). Mangler den, brukes default-verdier.
    #[arg(short, long, default_value = "squadload.json", env = "SQUADLOAD_CONFIG")]
    config: PathBuf,

    /// Overstyr lagerfilen fra konfig
    #[arg(long, env = "SQUADLOAD_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Datoer med registreringer, nyeste først
    Dates,

    /// Øktrapport for en dato
    Report {
        date: String,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Skriv til fil (standard eksportnavn) i stedet for stdout
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, env = "SQUADLOAD_STAFF_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Registrer PRE (hvile, stress, tretthet)
    SubmitPre {
        player: String,
        #[arg(allow_negative_numbers = true)]
        rest: i32,
        #[arg(allow_negative_numbers = true)]
        stress: i32,
        #[arg(allow_negative_numbers = true)]
        fatigue: i32,
        /// Standard: dagens dato
        #[arg(long)]
        date: Option<String>,
    },

    /// Registrer POST (intensitet, tretthet)
    SubmitPost {
        player: String,
        #[arg(allow_negative_numbers = true)]
        intensity: i32,
        #[arg(allow_negative_numbers = true)]
        fatigue: i32,
        #[arg(long)]
        date: Option<String>,
    },

    /// Slett ALLE registreringer
    Clear {
        #[arg(long)]
        yes: bool,
        #[arg(long, env = "SQUADLOAD_STAFF_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Prometheus-tellere for denne kjøringen
    Metrics,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squadload_core=info,squadload=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = load_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(store) = args.store {
        cfg.store_path = store;
    }
    info!("lager: {}", cfg.store_path.display());

    let monitor = LoadMonitor::from_config(&cfg);
    let date_or_today = |d: Option<String>| d.map(DateLabel::from).unwrap_or_else(DateLabel::today);

    match args.command {
        Command::Dates => {
            for d in monitor.list_available_dates() {
                println!("{}", d);
            }
        }

        Command::Report {
            date,
            format,
            out_dir,
            secret,
        } => {
            let renderer: Box<dyn ReportRenderer> = match format {
                Format::Text => Box::new(TextRenderer::default()),
                Format::Csv => Box::new(CsvRenderer),
                Format::Json => Box::new(JsonRenderer),
            };
            let policy = cfg.authorization_policy();
            let export = monitor
                .export_report(policy.as_ref(), &secret, &DateLabel::from(date), renderer.as_ref())
                .context("report failed")?;

            match out_dir {
                Some(dir) => {
                    let path = dir.join(&export.file_name);
                    std::fs::write(&path, &export.bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{}", path.display());
                }
                None => std::io::stdout().write_all(&export.bytes)?,
            }
        }

        Command::SubmitPre {
            player,
            rest,
            stress,
            fatigue,
            date,
        } => {
            let metrics = PreMetrics {
                rest_quality: rest,
                stress,
                muscular_fatigue: fatigue,
            };
            submit_outcome(monitor.submit_pre(&player, &date_or_today(date), metrics), &player)?;
        }

        Command::SubmitPost {
            player,
            intensity,
            fatigue,
            date,
        } => {
            let metrics = PostMetrics {
                perceived_intensity: intensity,
                current_fatigue: fatigue,
            };
            submit_outcome(monitor.submit_post(&player, &date_or_today(date), metrics), &player)?;
        }

        Command::Clear { yes, secret } => {
            if !yes {
                bail!("refusing to clear the store without --yes");
            }
            let policy = cfg.authorization_policy();
            monitor
                .clear_all(policy.as_ref(), &secret)
                .context("clear failed")?;
            println!("store cleared");
        }

        Command::Metrics => {
            print!("{}", squadload_core::metrics::gather_text());
        }
    }

    Ok(())
}

fn submit_outcome(res: squadload_core::Result<()>, player: &str) -> Result<()> {
    match res {
        Ok(()) => {
            println!(
                "¡Hecho! Datos guardados para {}.",
                squadload_core::models::short_name(player)
            );
            Ok(())
        }
        // Avvisninger er ikke fatale: vis meldingen og avslutt med feilkode
        Err(CoreError::Rejected(reason)) => bail!("{}", reason),
        Err(e) => Err(e).context("submission failed"),
    }
}
