//! Metric definition generation and resolution.

pub mod expander;
pub mod identity;
pub mod resolver;

pub use expander::{generate_metric_definitions, CombinationExpander};
pub use identity::{
    generate_metric_id, generate_metric_title, refresh_title, refresh_titles, DYNAMIC_PLACEHOLDER,
};
pub use resolver::{resolve_metric_definition, try_resolve_metric_definition, VariableResolver};
