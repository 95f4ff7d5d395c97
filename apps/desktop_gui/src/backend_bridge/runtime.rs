//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{FactStore, SupabaseStore};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Runs store calls on a worker thread. Each command gets its own task, so requests overlap
/// exactly as the user issues them; ordering is resolved by the board on the UI side.
pub fn launch(store: SupabaseStore, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!(table = %store.settings().table_url(), "backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let store = store.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = run_command(&store, cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui closed before backend result was delivered");
                    }
                });
            }
        });
    });
}

async fn run_command<S: FactStore + ?Sized>(store: &S, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::LoadFacts { ticket } => UiEvent::FactsLoaded {
            ticket,
            result: store.list_facts(ticket.filter()).await,
        },
        BackendCommand::InsertFact { new_fact } => UiEvent::FactInserted {
            result: store.insert_fact(&new_fact).await,
        },
        BackendCommand::Vote { request } => UiEvent::VoteRecorded {
            request,
            result: store
                .increment_vote(request.id, request.kind, request.current)
                .await,
        },
    }
}
