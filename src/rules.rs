//! Pricing rules over a computed cost grid.

use crate::grid::CostGrid;
use crate::layout::{BASE_COMPONENT_ROWS, COST_COLUMN, PRICED_ROWS, row_quantity};
use crate::model::{PricedLine, PricingInputs};

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub base_cost: f64,
    pub base_sell: f64,
    pub options_total: f64,
    pub total: f64,
    pub lines: Vec<PricedLine>,
}

/// Turn a cost grid into a priced breakdown: sum the base component rows,
/// convert each selected option's cost to sell at the requested margin,
/// and itemize only options with a non-zero quantity.
pub fn compute_from_cost_grid(inputs: &PricingInputs, grid: &CostGrid) -> Breakdown {
    let margin = inputs.margin;

    let base_cost: f64 = BASE_COMPONENT_ROWS
        .iter()
        .map(|&row| grid.number(row, COST_COLUMN))
        .sum();
    let base_sell = to_sell(base_cost, margin);

    let mut lines = Vec::new();
    let mut options_total = 0.0;
    for &(row, label) in PRICED_ROWS {
        let qty = row_quantity(inputs, row);
        if qty == 0 {
            continue;
        }
        let cost = grid.number(row, COST_COLUMN);
        let sell = to_sell(cost, margin);
        options_total += sell * qty as f64;
        lines.push(PricedLine {
            label: label.to_string(),
            qty,
            cost: round2(cost),
            sell: round2(sell),
        });
    }

    Breakdown {
        base_cost: round2(base_cost),
        base_sell: round2(base_sell),
        options_total: round2(options_total),
        total: round2(base_sell + options_total),
        lines,
    }
}

/// Cost to sell conversion; margins at or beyond ~1.0 pass cost through
/// rather than dividing by zero.
fn to_sell(cost: f64, margin: f64) -> f64 {
    if margin < 0.9999 {
        cost / (1.0 - margin)
    } else {
        cost
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
