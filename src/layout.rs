//! Cell map of the costing workbook's Summary sheet.
//!
//! Rows and addresses mirror the workbook layout the automation writes
//! into and reads back from; the pricing rules consume the same map.

use crate::model::{Feeding, Guarding, PricingInputs, Training, Transformer};

pub const SUMMARY_SHEET: &str = "Summary";
pub const MARGIN_CELL: &str = "M4";

/// Column J holds computed costs.
pub const COST_COLUMN: u32 = 10;

/// Rows summed into the base machine cost.
pub const BASE_COMPONENT_ROWS: &[u32] = &[4, 5, 6, 7, 8, 9, 10, 14, 17, 24, 31];

/// Input flag/quantity cells, cleared before each write pass.
pub const FLAG_CELLS: &[&str] = &[
    "H18", "H19", "H20", "H32", "H33", "H38", "H39", "H40", "H45", "H46", "H47",
];

/// Priced option rows and their canonical labels.
pub const PRICED_ROWS: &[(u32, &str)] = &[
    (18, "Infeed – Front USL"),
    (19, "Infeed – Side USL"),
    (20, "Infeed – Side Badger"),
    (32, "Guarding – Taller"),
    (33, "Guarding – Netting"),
    (38, "Spare Parts Package"),
    (39, "Spare Saw Blades"),
    (40, "Spare Foam Pads"),
    (45, "Training (English & Spanish)"),
    (46, "Transformer – Canada"),
    (47, "Transformer – Step Up"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub address: String,
    pub value: f64,
}

impl CellWrite {
    fn new(address: &str, value: f64) -> Self {
        Self {
            address: address.to_string(),
            value,
        }
    }
}

/// Deterministic write plan for one computation: margin first, then a full
/// clear of every flag cell, then quantities and selected option flags.
/// Plan order is stable because the fingerprint assumes identical inputs
/// produce identical engine interactions.
pub fn input_edit_plan(inputs: &PricingInputs) -> Vec<CellWrite> {
    let mut plan = Vec::with_capacity(FLAG_CELLS.len() + 8);
    plan.push(CellWrite::new(MARGIN_CELL, inputs.margin));

    for addr in FLAG_CELLS {
        plan.push(CellWrite::new(addr, 0.0));
    }

    plan.push(CellWrite::new("H38", inputs.spare_parts_qty as f64));
    plan.push(CellWrite::new("H39", inputs.spare_blades_qty as f64));
    plan.push(CellWrite::new("H40", inputs.spare_pads_qty as f64));

    match inputs.guarding {
        Guarding::Standard => {}
        Guarding::Tall => plan.push(CellWrite::new("H32", 1.0)),
        Guarding::TallWithNetting => plan.push(CellWrite::new("H33", 1.0)),
    }
    match inputs.feeding {
        Feeding::No => {}
        Feeding::FrontUsl => plan.push(CellWrite::new("H18", 1.0)),
        Feeding::SideUsl => plan.push(CellWrite::new("H19", 1.0)),
        Feeding::SideBadger => plan.push(CellWrite::new("H20", 1.0)),
    }
    match inputs.transformer {
        Transformer::None => {}
        Transformer::Canada => plan.push(CellWrite::new("H46", 1.0)),
        Transformer::StepUp => plan.push(CellWrite::new("H47", 1.0)),
    }
    if inputs.training == Training::Bilingual {
        plan.push(CellWrite::new("H45", 1.0));
    }

    plan
}

/// Selected quantity for a priced option row under the given inputs.
pub fn row_quantity(inputs: &PricingInputs, row: u32) -> u32 {
    match row {
        18 => (inputs.feeding == Feeding::FrontUsl) as u32,
        19 => (inputs.feeding == Feeding::SideUsl) as u32,
        20 => (inputs.feeding == Feeding::SideBadger) as u32,
        32 => (inputs.guarding == Guarding::Tall) as u32,
        33 => (inputs.guarding == Guarding::TallWithNetting) as u32,
        38 => inputs.spare_parts_qty,
        39 => inputs.spare_blades_qty,
        40 => inputs.spare_pads_qty,
        45 => (inputs.training == Training::Bilingual) as u32,
        46 => (inputs.transformer == Transformer::Canada) as u32,
        47 => (inputs.transformer == Transformer::StepUp) as u32,
        _ => 0,
    }
}
