pub mod dimensions;
pub mod indicators;
pub mod metrics;
pub mod widgets;
