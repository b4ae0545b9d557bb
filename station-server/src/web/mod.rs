//! Web layer for the arrivals board.
//!
//! Thin JSON wrappers over the aggregation engine: every handler reads
//! or pokes the board, the lookup client, or the weather cache and
//! serialises the answer.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
