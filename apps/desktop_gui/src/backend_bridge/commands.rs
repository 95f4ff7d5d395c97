//! Backend commands queued from UI to backend worker.

use client_core::{LoadTicket, VoteRequest};
use shared::protocol::NewFact;

pub enum BackendCommand {
    LoadFacts { ticket: LoadTicket },
    InsertFact { new_fact: NewFact },
    Vote { request: VoteRequest },
}
