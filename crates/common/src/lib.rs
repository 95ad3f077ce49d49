pub mod domain;
pub mod telemetry;

pub use domain::*;
pub use telemetry::*;
