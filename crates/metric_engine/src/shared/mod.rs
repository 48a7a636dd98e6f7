pub mod config;
pub mod error;
pub mod format;
pub mod indicators;
pub mod metrics;
pub mod mock;
pub mod product;
pub mod widget;
