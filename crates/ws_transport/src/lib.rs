mod command_api;
mod stream;

pub use command_api::*;
pub use stream::*;
