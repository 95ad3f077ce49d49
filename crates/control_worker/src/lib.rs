pub mod domain;
pub mod presentation;

pub use domain::*;
pub use presentation::*;
