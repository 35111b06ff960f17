//! Card store implementations.

mod memory;
mod sqlite;

pub use memory::InMemoryCardStore;
pub use sqlite::SqliteCardStore;
