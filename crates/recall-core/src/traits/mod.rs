//! Collaborator traits for recall.

mod card_store;
mod clock;

pub use card_store::*;
pub use clock::*;
