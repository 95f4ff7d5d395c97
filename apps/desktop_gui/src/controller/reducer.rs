//! Folds backend results into the fact board.

use client_core::{FactBoard, LoadOutcome};

use crate::controller::events::{UiError, UiEvent};

/// Applies one backend event. Returns the error to surface, if any.
pub fn apply_ui_event(board: &mut FactBoard, event: UiEvent) -> Option<UiError> {
    match event {
        UiEvent::FactsLoaded { ticket, result } => match board.apply_load(ticket, result) {
            Ok(LoadOutcome::Applied { .. }) | Ok(LoadOutcome::Superseded) => None,
            Err(err) => Some(UiError::from_board(&err)),
        },
        UiEvent::FactInserted { result } => board
            .apply_submit(result)
            .err()
            .map(|err| UiError::from_board(&err)),
        UiEvent::VoteRecorded { request, result } => board
            .apply_vote(request, result)
            .err()
            .map(|err| UiError::from_board(&err)),
        UiEvent::Error(err) => Some(err),
    }
}

#[cfg(test)]
mod tests {
    use client_core::StoreError;
    use shared::{
        domain::{Category, CategoryFilter, Fact, FactId, VoteKind},
        error::{ApiError, ErrorCode},
        protocol::FactDraft,
    };

    use super::*;
    use crate::controller::events::{UiErrorCategory, UiErrorContext};

    fn fact(id: i64, likes: u32) -> Fact {
        Fact {
            id: FactId(id),
            text: format!("fact {id}"),
            source: "https://example.com".to_string(),
            category: Category::Technology,
            likes,
            upvotes: 0,
            downvotes: 0,
            created_at: None,
        }
    }

    fn api_failure(status: u16, message: &str) -> StoreError {
        StoreError::Api {
            status,
            error: ApiError::new(ErrorCode::from_status(status), message),
        }
    }

    #[test]
    fn load_failure_becomes_alert() {
        let mut board = FactBoard::new();
        let ticket = board.set_category(CategoryFilter::Only(Category::Technology));

        let err = apply_ui_event(
            &mut board,
            UiEvent::FactsLoaded {
                ticket,
                result: Err(api_failure(401, "Invalid API key")),
            },
        )
        .expect("error surfaced");

        assert!(err.is_alert());
        assert_eq!(err.context(), UiErrorContext::LoadFacts);
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(!board.is_loading());
    }

    #[test]
    fn out_of_order_loads_keep_latest_selection() {
        let mut board = FactBoard::new();
        let older = board.set_category(CategoryFilter::All);
        let newer = board.set_category(CategoryFilter::Only(Category::Technology));

        assert!(apply_ui_event(
            &mut board,
            UiEvent::FactsLoaded {
                ticket: newer,
                result: Ok(vec![fact(1, 5)]),
            },
        )
        .is_none());
        assert!(apply_ui_event(
            &mut board,
            UiEvent::FactsLoaded {
                ticket: older,
                result: Ok(vec![fact(2, 9), fact(3, 8)]),
            },
        )
        .is_none());

        assert_eq!(board.facts().len(), 1);
        assert_eq!(board.facts()[0].id, FactId(1));
    }

    #[test]
    fn insert_failure_is_a_notice_and_keeps_form() {
        let mut board = FactBoard::new();
        board.toggle_form();
        *board.draft_mut() = FactDraft::new("Valid fact", "https://example.com", "technology");
        board.begin_submit().expect("valid draft");

        let err = apply_ui_event(
            &mut board,
            UiEvent::FactInserted {
                result: Err(api_failure(500, "insert failed")),
            },
        )
        .expect("error surfaced");

        assert!(!err.is_alert());
        assert_eq!(err.context(), UiErrorContext::SubmitFact);
        assert!(board.show_form());
        assert_eq!(board.draft().text, "Valid fact");
    }

    #[test]
    fn vote_success_updates_row_quietly() {
        let mut board = FactBoard::new();
        let ticket = board.begin_load();
        apply_ui_event(
            &mut board,
            UiEvent::FactsLoaded {
                ticket,
                result: Ok(vec![fact(1, 3), fact(2, 1)]),
            },
        );
        let request = board.begin_vote(FactId(1), VoteKind::Likes).expect("vote");

        assert!(apply_ui_event(
            &mut board,
            UiEvent::VoteRecorded {
                request,
                result: Ok(fact(1, 4)),
            },
        )
        .is_none());
        assert_eq!(board.facts()[0].likes, 4);
        assert_eq!(board.facts()[1], fact(2, 1));
    }
}
