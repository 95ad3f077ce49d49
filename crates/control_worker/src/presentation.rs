mod log_presenter;

pub use log_presenter::*;
