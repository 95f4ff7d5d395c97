use std::collections::HashSet;

use shared::{
    domain::{CategoryFilter, Fact, FactId, VoteKind},
    error::DraftError,
    protocol::{FactDraft, NewFact},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::store::{FactStore, StoreError};

pub const EMPTY_BOARD_MESSAGE: &str = "No facts under this category yet! Create the first one";

/// How a front end should present a [`BoardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSurface {
    /// Blocking notice the user has to dismiss.
    Alert,
    /// Non-blocking status message.
    Notice,
    /// Shown next to the form field that caused it.
    Inline,
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid fact: {0}")]
    InvalidDraft(#[from] DraftError),
    #[error("a fact is already being submitted")]
    UploadInFlight,
    #[error("A problem was encountered while fetching data: {0}")]
    Load(#[source] StoreError),
    #[error("failed to share fact: {0}")]
    Insert(#[source] StoreError),
    #[error("failed to record {kind} for fact {id}: {source}")]
    Vote {
        id: FactId,
        kind: VoteKind,
        #[source]
        source: StoreError,
    },
    #[error("fact {0} is not on the board")]
    UnknownFact(FactId),
    #[error("a vote for fact {0} is already in flight")]
    VoteInFlight(FactId),
}

impl BoardError {
    pub fn surface(&self) -> ErrorSurface {
        match self {
            BoardError::Load(_) => ErrorSurface::Alert,
            BoardError::InvalidDraft(_) => ErrorSurface::Inline,
            BoardError::UploadInFlight
            | BoardError::Insert(_)
            | BoardError::Vote { .. }
            | BoardError::UnknownFact(_)
            | BoardError::VoteInFlight(_) => ErrorSurface::Notice,
        }
    }

    /// The store failure behind this error, if a store call failed.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            BoardError::Load(err) | BoardError::Insert(err) => Some(err),
            BoardError::Vote { source, .. } => Some(source),
            BoardError::InvalidDraft(_)
            | BoardError::UploadInFlight
            | BoardError::UnknownFact(_)
            | BoardError::VoteInFlight(_) => None,
        }
    }
}

/// Identifies one list read. Only the most recently issued ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    filter: CategoryFilter,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was issued before this one resolved; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequest {
    pub id: FactId,
    pub kind: VoteKind,
    pub current: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardView<'a> {
    Loading,
    Empty,
    Facts(&'a [Fact]),
}

/// Client-side view state for the fact list.
///
/// Every operation comes in two halves: a `begin_*` step that updates flags and describes the
/// store call to make, and an `apply_*` step that folds the store's answer back in. Front ends that
/// run store calls elsewhere (a worker thread, another task) drive the halves themselves; the async
/// helpers at the bottom run both around a [`FactStore`].
#[derive(Debug, Default)]
pub struct FactBoard {
    facts: Vec<Fact>,
    current_category: CategoryFilter,
    is_loading: bool,
    show_form: bool,
    draft: FactDraft,
    is_uploading: bool,
    updating: HashSet<FactId>,
    load_seq: u64,
}

impl FactBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.iter().find(|fact| fact.id == id)
    }

    pub fn current_category(&self) -> CategoryFilter {
        self.current_category
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn show_form(&self) -> bool {
        self.show_form
    }

    pub fn draft(&self) -> &FactDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FactDraft {
        &mut self.draft
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn is_updating(&self, id: FactId) -> bool {
        self.updating.contains(&id)
    }

    pub fn toggle_form(&mut self) -> bool {
        self.show_form = !self.show_form;
        self.show_form
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.show_form {
            "Close"
        } else {
            "Share a fact"
        }
    }

    pub fn view(&self) -> BoardView<'_> {
        if self.is_loading {
            BoardView::Loading
        } else if self.facts.is_empty() {
            BoardView::Empty
        } else {
            BoardView::Facts(&self.facts)
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "There are {} facts in the database. Feel free to add your own!",
            self.facts.len()
        )
    }

    /// Reloads the current category.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        self.is_loading = true;
        LoadTicket {
            seq: self.load_seq,
            filter: self.current_category,
        }
    }

    pub fn set_category(&mut self, filter: CategoryFilter) -> LoadTicket {
        self.current_category = filter;
        self.begin_load()
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Fact>, StoreError>,
    ) -> Result<LoadOutcome, BoardError> {
        if ticket.seq != self.load_seq {
            warn!(
                seq = ticket.seq,
                latest = self.load_seq,
                filter = %ticket.filter,
                "board: dropping superseded load"
            );
            return Ok(LoadOutcome::Superseded);
        }

        self.is_loading = false;
        match result {
            Ok(facts) => {
                let count = facts.len();
                self.facts = facts;
                info!(filter = %ticket.filter, count, "board: facts loaded");
                Ok(LoadOutcome::Applied { count })
            }
            Err(err) => {
                error!(filter = %ticket.filter, "board: failed to load facts: {err}");
                Err(BoardError::Load(err))
            }
        }
    }

    /// Validates the draft. Nothing changes when validation fails.
    pub fn begin_submit(&mut self) -> Result<NewFact, BoardError> {
        if self.is_uploading {
            return Err(BoardError::UploadInFlight);
        }
        let new_fact = self.draft.validate().inspect_err(|err| {
            debug!("board: draft rejected: {err}");
        })?;
        self.is_uploading = true;
        Ok(new_fact)
    }

    pub fn apply_submit(&mut self, result: Result<Fact, StoreError>) -> Result<Fact, BoardError> {
        self.is_uploading = false;
        match result {
            Ok(fact) => {
                self.facts.insert(0, fact.clone());
                self.draft.clear();
                self.show_form = false;
                Ok(fact)
            }
            Err(err) => {
                error!("board: error inserting new fact: {err}");
                Err(BoardError::Insert(err))
            }
        }
    }

    pub fn begin_vote(&mut self, id: FactId, kind: VoteKind) -> Result<VoteRequest, BoardError> {
        let current = self
            .fact(id)
            .map(|fact| fact.votes(kind))
            .ok_or(BoardError::UnknownFact(id))?;
        if !self.updating.insert(id) {
            return Err(BoardError::VoteInFlight(id));
        }
        Ok(VoteRequest { id, kind, current })
    }

    /// Replaces the voted row with the store's copy. Returns `None` when the row left the list
    /// while the vote was in flight.
    pub fn apply_vote(
        &mut self,
        request: VoteRequest,
        result: Result<Fact, StoreError>,
    ) -> Result<Option<Fact>, BoardError> {
        self.updating.remove(&request.id);
        match result {
            Ok(updated) => {
                let Some(slot) = self.facts.iter_mut().find(|fact| fact.id == request.id) else {
                    debug!(fact_id = request.id.0, "board: voted fact no longer listed");
                    return Ok(None);
                };
                *slot = updated.clone();
                Ok(Some(updated))
            }
            Err(err) => {
                error!(
                    fact_id = request.id.0,
                    counter = request.kind.column(),
                    "board: failed to record vote: {err}"
                );
                Err(BoardError::Vote {
                    id: request.id,
                    kind: request.kind,
                    source: err,
                })
            }
        }
    }

    pub async fn load<S>(&mut self, store: &S) -> Result<LoadOutcome, BoardError>
    where
        S: FactStore + ?Sized,
    {
        let ticket = self.begin_load();
        let result = store.list_facts(ticket.filter()).await;
        self.apply_load(ticket, result)
    }

    pub async fn select_category<S>(
        &mut self,
        store: &S,
        filter: CategoryFilter,
    ) -> Result<LoadOutcome, BoardError>
    where
        S: FactStore + ?Sized,
    {
        let ticket = self.set_category(filter);
        let result = store.list_facts(ticket.filter()).await;
        self.apply_load(ticket, result)
    }

    pub async fn submit<S>(&mut self, store: &S) -> Result<Fact, BoardError>
    where
        S: FactStore + ?Sized,
    {
        let new_fact = self.begin_submit()?;
        let result = store.insert_fact(&new_fact).await;
        self.apply_submit(result)
    }

    pub async fn vote<S>(
        &mut self,
        store: &S,
        id: FactId,
        kind: VoteKind,
    ) -> Result<Option<Fact>, BoardError>
    where
        S: FactStore + ?Sized,
    {
        let request = self.begin_vote(id, kind)?;
        let result = store
            .increment_vote(request.id, request.kind, request.current)
            .await;
        self.apply_vote(request, result)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
