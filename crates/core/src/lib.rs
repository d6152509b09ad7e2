pub mod error;
pub mod event;

pub use error::{BarError, Result};
pub use event::BarEvent;
