use serde::{Deserialize, Serialize};

use crate::shared::metrics::ModifierKind;

// ---------------------------------------------------------------------------
// Indicator identity & display metadata
// ---------------------------------------------------------------------------

/// How to format the numeric value on the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Money { currency: String },
    Percent { decimals: u8 },
    Integer,
}

/// Plausible value range of an indicator, used by mock data synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Static metadata describing one indicator (label, format, modifier rules).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorMeta {
    pub key: String,
    pub label: String,
    pub short_label: Option<String>,
    pub format: ValueFormat,
    pub description: Option<String>,
    /// Modifier kinds that must carry a value in every generated definition.
    pub required_modifiers: Vec<ModifierKind>,
    /// Modifier kinds that are meaningful for this indicator.
    pub compatible_modifiers: Vec<ModifierKind>,
    pub range: ValueRange,
}

// ---------------------------------------------------------------------------
// Modifier metadata
// ---------------------------------------------------------------------------

/// One selectable option of a modifier kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierOptionMeta {
    pub value: String,
    pub label: String,
}

/// Static metadata describing one modifier kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierMeta {
    pub kind: ModifierKind,
    pub label: String,
    pub options: Vec<ModifierOptionMeta>,
    pub default_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Full catalogue handed to the configuration UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorCatalogResponse {
    pub indicators: Vec<IndicatorMeta>,
    pub modifiers: Vec<ModifierMeta>,
}
