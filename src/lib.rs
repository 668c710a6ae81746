pub mod error;
pub mod model;
pub mod processor;

pub use error::ProcessError;
pub use model::{Record, StationExtremes, StationTable};
pub use processor::{process_events, EventStream};
