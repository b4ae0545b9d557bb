//! External enrichment provider boundary.
//!
//! The real-time lookup and weather lookup are separate programs invoked
//! per request. They are an untrusted text interface: output uses
//! Python-style single-quoted dictionaries and may be malformed, so every
//! response goes through a normalise-then-parse step. Provider failures
//! never propagate past the clients built on this module.

mod command;
mod error;
mod parse;

pub use command::ProviderCommand;
pub use error::ProviderError;
pub use parse::{field_f64, field_str, loose_json, normalize_quotes};
