pub mod maintenance;
pub mod manager;
pub mod naming;
pub mod relations;
pub mod search;
pub mod store;
pub mod types;

pub use manager::{AppendThought, SessionManager};
