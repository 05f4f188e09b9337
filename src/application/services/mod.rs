//! Application services - Business logic orchestration

pub mod counter_service;
pub mod milestone;

pub use counter_service::CounterService;
pub use milestone::milestone_message;
