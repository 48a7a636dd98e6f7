//! Reference mock implementation of the data-fetch contract.

pub mod dimensions;
pub mod synthesizer;
pub mod table;

pub use dimensions::{generate_dimension_combinations, DimensionCombinations};
pub use synthesizer::generate_metric_value;
pub use table::{build_mock_table, mock_metric_widget_value, MockTableBuilder};
