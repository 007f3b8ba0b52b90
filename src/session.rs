//! Explorer session: selection state, in-flight requests, and their results.
//!
//! The session is the single owner of state. Every fetch runs as a spawned
//! task that reports back through a channel with the ticket it was issued
//! under. Each trigger (species catalog, metadata, version, species) has one
//! slot; issuing a new request on a slot aborts the previous task and bumps
//! the ticket, so a late answer to an old request is dropped instead of
//! overwriting a newer selection.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::DetailCache;
use crate::catalog::{load_metadata, load_species_catalog, GenerationCatalog, Metadata};
use crate::client::CatalogSource;
use crate::errors::{FetchError, FetchResult, SelectionError};
use crate::resolver::{reconcile_selection, resolve_generation};
use schema::{SpeciesDetail, SpeciesRef, VersionRef};

/// What started a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    SpeciesCatalog,
    Metadata,
    Version,
    Species,
}

impl Trigger {
    fn action(&self) -> &'static str {
        match self {
            Trigger::SpeciesCatalog => "load the species list",
            Trigger::Metadata => "load the game list",
            Trigger::Version => "work out the game's generation",
            Trigger::Species => "load species details",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct TriggerSlot {
    ticket: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl TriggerSlot {
    fn issue(&mut self) -> Ticket {
        self.cancel();
        self.ticket += 1;
        Ticket(self.ticket)
    }

    fn attach(&mut self, handle: JoinHandle<()>) {
        self.in_flight = Some(handle);
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        self.in_flight.is_some() && ticket.0 == self.ticket
    }

    fn finish(&mut self) {
        self.in_flight = None;
    }

    fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Drop for TriggerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug)]
pub(crate) enum Completion {
    SpeciesCatalog(Ticket, FetchResult<Vec<SpeciesRef>>),
    Metadata(Ticket, FetchResult<Metadata>),
    Generation(Ticket, FetchResult<Option<String>>),
    Detail {
        ticket: Ticket,
        species: String,
        result: FetchResult<SpeciesDetail>,
    },
}

/// Current choices and what they resolve to.
///
/// `chosen_species` is always in `visible_species` when that list is not
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub chosen_version: Option<String>,
    /// Empty while resolution is pending or when it found nothing
    pub resolved_generation: Option<String>,
    pub chosen_species: Option<String>,
    pub visible_species: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub catalog: bool,
    pub metadata: bool,
    pub detail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub trigger: Trigger,
    pub message: String,
}

pub struct Session {
    source: Arc<dyn CatalogSource>,
    concurrency: usize,
    species: Vec<SpeciesRef>,
    metadata: Metadata,
    selection: Selection,
    detail: Option<Arc<SpeciesDetail>>,
    cache: DetailCache,
    error: Option<SessionError>,
    species_catalog_slot: TriggerSlot,
    metadata_slot: TriggerSlot,
    version_slot: TriggerSlot,
    species_slot: TriggerSlot,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

fn spawn_on<T, Fut, F>(
    slot: &mut TriggerSlot,
    completions: &mpsc::UnboundedSender<Completion>,
    request: Fut,
    complete: F,
) where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    F: FnOnce(Ticket, T) -> Completion + Send + 'static,
{
    let ticket = slot.issue();
    let completions = completions.clone();
    let handle = tokio::spawn(async move {
        let result = request.await;
        // The receiver lives as long as the session; a closed channel means
        // the session is gone and nobody wants the answer.
        let _ = completions.send(complete(ticket, result));
    });
    slot.attach(handle);
}

impl Session {
    pub fn new(source: Arc<dyn CatalogSource>, concurrency: usize) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            concurrency: concurrency.max(1),
            species: Vec::new(),
            metadata: Metadata::default(),
            selection: Selection::default(),
            detail: None,
            cache: DetailCache::new(),
            error: None,
            species_catalog_slot: TriggerSlot::default(),
            metadata_slot: TriggerSlot::default(),
            version_slot: TriggerSlot::default(),
            species_slot: TriggerSlot::default(),
            completions_tx,
            completions_rx,
        }
    }

    /// Kick off the species-catalog and metadata loads.
    pub fn start(&mut self) {
        tracing::info!("Loading catalogs");

        let source = Arc::clone(&self.source);
        spawn_on(
            &mut self.species_catalog_slot,
            &self.completions_tx,
            async move { load_species_catalog(source.as_ref()).await },
            Completion::SpeciesCatalog,
        );

        let source = Arc::clone(&self.source);
        let concurrency = self.concurrency;
        spawn_on(
            &mut self.metadata_slot,
            &self.completions_tx,
            async move { load_metadata(source.as_ref(), concurrency).await },
            Completion::Metadata,
        );
    }

    /// Choose a game. The species list fails open until its generation is
    /// resolved.
    pub fn select_version(&mut self, name: &str) -> Result<(), SelectionError> {
        if self.metadata.versions.is_empty() {
            return Err(SelectionError::CatalogNotLoaded("game"));
        }
        let version: VersionRef = self
            .metadata
            .versions
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownVersion(name.to_string()))?;

        tracing::debug!("Selected version {}", version.name);
        self.selection.chosen_version = Some(version.name.clone());
        self.selection.resolved_generation = None;
        self.clear_error(Trigger::Version);
        self.refilter();

        let source = Arc::clone(&self.source);
        spawn_on(
            &mut self.version_slot,
            &self.completions_tx,
            async move { resolve_generation(source.as_ref(), &version).await },
            Completion::Generation,
        );
        Ok(())
    }

    /// Choose a species from the visible list.
    pub fn select_species(&mut self, name: &str) -> Result<(), SelectionError> {
        if self.species.is_empty() {
            return Err(SelectionError::CatalogNotLoaded("species"));
        }
        if !self.selection.visible_species.iter().any(|s| s == name) {
            return Err(SelectionError::UnknownSpecies(name.to_string()));
        }

        tracing::debug!("Selected species {}", name);
        self.selection.chosen_species = Some(name.to_string());
        self.request_detail();
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Wait for one completion and apply it. Returns `false` when nothing is
    /// in flight.
    pub async fn next_update(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no request is in flight.
    pub async fn settle(&mut self) {
        while self.next_update().await {}
    }

    pub fn is_busy(&self) -> bool {
        let loading = self.loading();
        loading.catalog || loading.metadata || loading.detail
    }

    pub fn loading(&self) -> LoadingFlags {
        LoadingFlags {
            catalog: self.species_catalog_slot.is_pending(),
            metadata: self.metadata_slot.is_pending() || self.version_slot.is_pending(),
            detail: self.species_slot.is_pending(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn versions(&self) -> &[VersionRef] {
        &self.metadata.versions
    }

    pub fn generations(&self) -> &GenerationCatalog {
        &self.metadata.generations
    }

    /// Last successfully loaded detail for the chosen species.
    pub fn detail(&self) -> Option<&SpeciesDetail> {
        self.detail.as_deref()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    fn refilter(&mut self) {
        let previous = self.selection.chosen_species.take();
        let next = reconcile_selection(
            &self.species,
            &self.metadata.generations,
            self.selection.resolved_generation.as_deref(),
            previous.as_deref(),
        );

        self.selection.visible_species = next.visible;
        self.selection.chosen_species = next.chosen;

        if self.selection.chosen_species != previous {
            tracing::debug!(
                "Species choice moved from {:?} to {:?}",
                previous,
                self.selection.chosen_species
            );
            self.request_detail();
        }
    }

    fn request_detail(&mut self) {
        let Some(name) = self.selection.chosen_species.clone() else {
            self.species_slot.cancel();
            self.detail = None;
            return;
        };

        if let Some(detail) = self.cache.get(&name) {
            tracing::debug!("Cache hit for {}", name);
            self.species_slot.cancel();
            self.detail = Some(detail);
            self.clear_error(Trigger::Species);
            return;
        }

        let Some(species) = self.species.iter().find(|s| s.name == name).cloned() else {
            return;
        };

        self.clear_error(Trigger::Species);
        let source = Arc::clone(&self.source);
        spawn_on(
            &mut self.species_slot,
            &self.completions_tx,
            async move { source.species_detail(&species).await },
            move |ticket, result| Completion::Detail {
                ticket,
                species: name,
                result,
            },
        );
    }

    pub(crate) fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::SpeciesCatalog(ticket, result) => {
                if !Self::take_if_current(&mut self.species_catalog_slot, ticket) {
                    return;
                }
                match result {
                    Ok(species) => {
                        self.species = species;
                        self.clear_error(Trigger::SpeciesCatalog);
                        self.refilter();
                    }
                    Err(e) => self.record_error(Trigger::SpeciesCatalog, e),
                }
            }
            Completion::Metadata(ticket, result) => {
                if !Self::take_if_current(&mut self.metadata_slot, ticket) {
                    return;
                }
                match result {
                    Ok(metadata) => {
                        self.metadata = metadata;
                        self.clear_error(Trigger::Metadata);
                        self.refilter();
                    }
                    Err(e) => self.record_error(Trigger::Metadata, e),
                }
            }
            Completion::Generation(ticket, result) => {
                if !Self::take_if_current(&mut self.version_slot, ticket) {
                    return;
                }
                match result {
                    Ok(generation) => {
                        tracing::info!(
                            "Version {:?} resolved to generation {:?}",
                            self.selection.chosen_version,
                            generation
                        );
                        self.selection.resolved_generation = generation;
                        self.clear_error(Trigger::Version);
                        self.refilter();
                    }
                    Err(e) => self.record_error(Trigger::Version, e),
                }
            }
            Completion::Detail {
                ticket,
                species,
                result,
            } => {
                if !Self::take_if_current(&mut self.species_slot, ticket) {
                    return;
                }
                match result {
                    Ok(detail) => {
                        let held = self.cache.insert(&species, Arc::new(detail));
                        if self.selection.chosen_species.as_deref() == Some(species.as_str()) {
                            self.detail = Some(held);
                        }
                        self.clear_error(Trigger::Species);
                    }
                    Err(e) => self.record_error(Trigger::Species, e),
                }
            }
        }
    }

    fn take_if_current(slot: &mut TriggerSlot, ticket: Ticket) -> bool {
        if slot.accepts(ticket) {
            slot.finish();
            true
        } else {
            tracing::trace!("Dropping stale completion {:?}", ticket);
            false
        }
    }

    fn record_error(&mut self, trigger: Trigger, error: FetchError) {
        tracing::warn!("Could not {}: {}", trigger.action(), error);
        self.error = Some(SessionError {
            trigger,
            message: format!("Could not {}: {}", trigger.action(), error),
        });
    }

    fn clear_error(&mut self, trigger: Trigger) {
        if self.error.as_ref().is_some_and(|e| e.trigger == trigger) {
            self.error = None;
        }
    }
}
