// Stores layer - Repositories over the event log and user table
pub mod event_store;
pub mod user_store;

pub use event_store::EventStore;
pub use user_store::UserStore;
