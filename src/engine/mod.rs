//! Engine facade: storage plus transactional dispatch.

mod dispatcher;
mod store;

pub use dispatcher::Engine;
pub use store::{MemoryStore, StateStore};
