//! UI/backend events and error modeling for the desktop GUI controller.

use client_core::{BoardError, ErrorSurface, LoadTicket, StoreError, VoteRequest};
use shared::domain::Fact;

pub enum UiEvent {
    FactsLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Fact>, StoreError>,
    },
    FactInserted {
        result: Result<Fact, StoreError>,
    },
    VoteRecorded {
        request: VoteRequest,
        result: Result<Fact, StoreError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadFacts,
    SubmitFact,
    Vote,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    surface: ErrorSurface,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let surface = match context {
            UiErrorContext::BackendStartup | UiErrorContext::LoadFacts => ErrorSurface::Alert,
            UiErrorContext::SubmitFact | UiErrorContext::Vote | UiErrorContext::General => {
                ErrorSurface::Notice
            }
        };
        Self {
            category: classify(&message),
            context,
            surface,
            message,
        }
    }

    pub fn from_board(err: &BoardError) -> Self {
        let context = match err {
            BoardError::Load(_) => UiErrorContext::LoadFacts,
            BoardError::InvalidDraft(_) | BoardError::UploadInFlight | BoardError::Insert(_) => {
                UiErrorContext::SubmitFact
            }
            BoardError::Vote { .. } | BoardError::UnknownFact(_) | BoardError::VoteInFlight(_) => {
                UiErrorContext::Vote
            }
        };
        let category = match (err, err.store_error()) {
            (BoardError::InvalidDraft(_), _) => UiErrorCategory::Validation,
            (_, Some(store_err)) => classify_store(store_err),
            (_, None) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            surface: err.surface(),
            message: err.to_string(),
        }
    }

    pub fn is_alert(&self) -> bool {
        self.surface == ErrorSurface::Alert
    }

    pub fn is_inline(&self) -> bool {
        self.surface == ErrorSurface::Inline
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn classify_store(err: &StoreError) -> UiErrorCategory {
    match (err, err.status()) {
        (_, Some(401 | 403)) => UiErrorCategory::Auth,
        (StoreError::Transport(_) | StoreError::Unavailable(_), _) => UiErrorCategory::Transport,
        (StoreError::Api { .. }, Some(status)) if status >= 500 => UiErrorCategory::Transport,
        (StoreError::Api { .. }, Some(400..=499)) => UiErrorCategory::Validation,
        _ => UiErrorCategory::Unknown,
    }
}

/// Startup failures only arrive as text.
fn classify(message: &str) -> UiErrorCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("status 401")
        || lower.contains("status 403")
        || lower.contains("api key")
        || lower.contains("unauthorized")
    {
        UiErrorCategory::Auth
    } else if lower.contains("invalid") || lower.contains("missing") {
        UiErrorCategory::Validation
    } else if lower.contains("request failed")
        || lower.contains("connection")
        || lower.contains("timed out")
        || lower.contains("disconnected")
        || lower.contains("unavailable")
    {
        UiErrorCategory::Transport
    } else {
        UiErrorCategory::Unknown
    }
}
