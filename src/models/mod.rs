//! Shared data models spanning the scanner layers.

pub mod bar;
pub mod scan;

pub use bar::{Bar, Symbol};
pub use scan::{RejectReason, ScanCounts, ScanReport, ScanResult, PATTERN_SHOOTING_STAR};
