//! Domain traits - Abstractions for infrastructure implementations

pub mod host;
pub mod store;

pub use host::{BotInfo, Host, SenderRole};
pub use store::CounterStore;
