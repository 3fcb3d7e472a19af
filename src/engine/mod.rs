mod core;
mod messages;
mod state;
mod worker;

#[cfg(test)]
pub(crate) mod stub;

pub use self::core::ScanEngine;
pub use state::{ScanSnapshot, ScanState};

