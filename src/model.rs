use crate::grid::CostGrid;
use crate::timing::PhaseTimings;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum Guarding {
    #[default]
    Standard,
    Tall,
    #[serde(rename = "Tall w/ Netting")]
    #[strum(serialize = "Tall w/ Netting")]
    TallWithNetting,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum Feeding {
    #[default]
    No,
    #[serde(rename = "Front USL")]
    #[strum(serialize = "Front USL")]
    FrontUsl,
    #[serde(rename = "Side USL")]
    #[strum(serialize = "Side USL")]
    SideUsl,
    #[serde(rename = "Side Badger")]
    #[strum(serialize = "Side Badger")]
    SideBadger,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum Transformer {
    #[default]
    None,
    Canada,
    #[serde(rename = "Step Up")]
    #[strum(serialize = "Step Up")]
    StepUp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum Training {
    #[default]
    English,
    #[serde(rename = "English & Spanish")]
    #[strum(serialize = "English & Spanish")]
    Bilingual,
}

/// Canonical pricing inputs. Validation (margin range, quantity steps,
/// option membership) happens before values reach this crate; field order
/// is part of the fingerprint contract and must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingInputs {
    /// Margin as a fraction, 0 <= m < 1.
    pub margin: f64,
    pub spare_parts_qty: u32,
    pub spare_blades_qty: u32,
    pub spare_pads_qty: u32,
    pub guarding: Guarding,
    pub feeding: Feeding,
    pub transformer: Transformer,
    pub training: Training,
}

impl Default for PricingInputs {
    fn default() -> Self {
        Self {
            margin: 0.24,
            spare_parts_qty: 0,
            spare_blades_qty: 0,
            spare_pads_qty: 0,
            guarding: Guarding::default(),
            feeding: Feeding::default(),
            transformer: Transformer::default(),
            training: Training::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeSource {
    LiveAutomation,
    FastRead,
    Cached,
}

impl ComputeSource {
    pub fn tag(self) -> &'static str {
        match self {
            Self::LiveAutomation => "live_automation",
            Self::FastRead => "fast_read",
            Self::Cached => "cached",
        }
    }
}

/// Per-attempt metadata returned alongside every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationMeta {
    pub source: ComputeSource,
    pub opened_readonly: bool,
    #[serde(flatten)]
    pub timings: PhaseTimings,
    /// Epoch seconds of cache insertion; present only when `source` is
    /// `cached`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub label: String,
    pub qty: u32,
    /// Unit cost as read from the workbook.
    pub cost: f64,
    /// Unit sell price after margin conversion.
    pub sell: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub margin: f64,
    pub base_cost: f64,
    pub base_sell: f64,
    pub options_total: f64,
    pub total: f64,
    pub lines: Vec<PricedLine>,
    pub grid: CostGrid,
    pub meta: ComputationMeta,
}
