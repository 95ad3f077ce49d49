mod agent_service;
mod connectivity;
mod latch;
mod threshold_engine;

pub use agent_service::*;
pub use connectivity::*;
pub use latch::*;
pub use threshold_engine::*;
