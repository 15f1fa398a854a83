//! Store backends.

pub mod memory_store;
#[cfg(feature = "sled")]
pub mod sled_store;

pub use memory_store::MemoryStore;
#[cfg(feature = "sled")]
pub use sled_store::{SledPreferenceDatabase, SledPreferences};
