pub mod drift;

pub use drift::{DriftMonitor, DriftReport, DriftStatus};
