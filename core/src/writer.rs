//! Enkelt-skriver: én tråd eier lageret og utfører hver
//! last-valider-legg til-lagre-syklus i kø-rekkefølge. Lukker lost-update
//! racet ved samtidige innsendinger i samme prosess.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::auth::AuthorizationPolicy;
use crate::dates::DateLabel;
use crate::error::{CoreError, Result};
use crate::models::{PostMetrics, PreMetrics, Roster, Store, SubmissionRecord};
use crate::report::{ReportModel, ReportTitles};
use crate::service::{apply_submission, list_available_dates, report_for};
use crate::storage::DocumentStore;

enum Command {
    Submit {
        record: SubmissionRecord,
        reply: Sender<Result<()>>,
    },
    Snapshot {
        reply: Sender<Store>,
    },
    ClearAll {
        reply: Sender<Result<usize>>,
    },
    Shutdown,
}

fn run<S: DocumentStore>(backend: S, roster: Roster, rx: Receiver<Command>) {
    for cmd in rx {
        match cmd {
            Command::Submit { record, reply } => {
                let mut store = backend.load();
                let res = apply_submission(&mut store, record, &roster)
                    .map_err(CoreError::from)
                    .and_then(|()| backend.save(&store).map_err(CoreError::from));
                let _ = reply.send(res);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(backend.load());
            }
            Command::ClearAll { reply } => {
                let mut store = backend.load();
                let removed = store.record_count();
                store.clear();
                let res = backend
                    .save(&store)
                    .map(|()| removed)
                    .map_err(CoreError::from);
                let _ = reply.send(res);
            }
            Command::Shutdown => break,
        }
    }
    debug!("skrivetråden avslutter");
}

/// Eier av skrivetråden. Stopper og venter på tråden ved drop.
pub struct StoreWriter {
    handle: WriterHandle,
    thread: Option<JoinHandle<()>>,
}

impl StoreWriter {
    pub fn spawn<S>(backend: S, roster: Roster, titles: ReportTitles) -> std::io::Result<Self>
    where
        S: DocumentStore + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let thread_roster = roster.clone();
        let thread = thread::Builder::new()
            .name("squadload-writer".into())
            .spawn(move || run(backend, thread_roster, rx))?;
        info!("skrivetråd startet");
        Ok(Self {
            handle: WriterHandle { tx, roster, titles },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> WriterHandle {
        self.handle.clone()
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        let _ = self.handle.tx.send(Command::Shutdown);
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                warn!("skrivetråden panikket");
            }
        }
    }
}

/// Klonbart håndtak; alle skriv og lesinger går gjennom køen.
#[derive(Clone)]
pub struct WriterHandle {
    tx: Sender<Command>,
    roster: Roster,
    titles: ReportTitles,
}

impl WriterHandle {
    fn request<T>(&self, make: impl FnOnce(Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(make(reply))
            .map_err(|_| CoreError::WriterUnavailable)?;
        rx.recv().map_err(|_| CoreError::WriterUnavailable)
    }

    pub fn submit(&self, record: SubmissionRecord) -> Result<()> {
        self.request(|reply| Command::Submit { record, reply })?
    }

    pub fn submit_pre(&self, player: &str, date: &DateLabel, metrics: PreMetrics) -> Result<()> {
        self.submit(SubmissionRecord::pre(player, date.clone(), metrics))
    }

    pub fn submit_post(&self, player: &str, date: &DateLabel, metrics: PostMetrics) -> Result<()> {
        self.submit(SubmissionRecord::post(player, date.clone(), metrics))
    }

    /// Konsistent lesing: kø-ordnet etter alle tidligere skriv.
    pub fn snapshot(&self) -> Result<Store> {
        self.request(|reply| Command::Snapshot { reply })
    }

    pub fn list_available_dates(&self) -> Result<Vec<DateLabel>> {
        Ok(list_available_dates(&self.snapshot()?))
    }

    pub fn get_report(
        &self,
        policy: &dyn AuthorizationPolicy,
        credential: &str,
        date: &DateLabel,
    ) -> Result<ReportModel> {
        if !policy.authorize(credential) {
            return Err(CoreError::Unauthorized);
        }
        let store = self.snapshot()?;
        Ok(report_for(&store, date, &self.roster, &self.titles))
    }

    /// Tømmer hele lageret; returnerer antall slettede innslag.
    pub fn clear_all(&self, policy: &dyn AuthorizationPolicy, credential: &str) -> Result<usize> {
        if !policy.authorize(credential) {
            return Err(CoreError::Unauthorized);
        }
        let removed = self.request(|reply| Command::ClearAll { reply })??;
        warn!("lageret er tømt via skrivetråden ({} innslag slettet)", removed);
        Ok(removed)
    }
}
