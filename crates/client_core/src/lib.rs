pub mod board;
pub mod config;
pub mod store;

pub use board::{
    BoardError, BoardView, ErrorSurface, FactBoard, LoadOutcome, LoadTicket, VoteRequest,
    EMPTY_BOARD_MESSAGE,
};
pub use config::{load_settings, StoreSettings};
pub use store::{FactStore, StoreError, SupabaseStore};
