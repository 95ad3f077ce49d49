mod alert;
mod command;
mod policy;
mod presentation;
mod result;
mod sample;
mod transport;
mod window;

pub use alert::*;
pub use command::*;
pub use policy::*;
pub use presentation::*;
pub use result::*;
pub use sample::*;
pub use transport::*;
pub use window::*;
