#![allow(dead_code)]
pub mod engine;

use quote_pricing::grid::{CellValue, CostGrid, GRID_COLS, GRID_ROWS};
use quote_pricing::layout::{BASE_COMPONENT_ROWS, COST_COLUMN, PRICED_ROWS};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BASE_ROW_COST: f64 = 1_000.0;

/// Unit cost placed in column J for each priced option row.
pub fn option_cost(row: u32) -> f64 {
    match row {
        18 => 3_000.0,
        19 => 3_100.0,
        20 => 3_200.0,
        32 => 2_000.0,
        33 => 2_500.0,
        38 => 500.0,
        39 => 25.0,
        40 => 10.0,
        45 => 800.0,
        46 => 1_200.0,
        47 => 1_300.0,
        _ => 0.0,
    }
}

/// In-memory cost grid with the standard fixture costs.
pub fn fixture_grid() -> CostGrid {
    let mut rows = Vec::with_capacity(GRID_ROWS as usize);
    for row in 1..=GRID_ROWS {
        let mut cells = vec![CellValue::Empty; GRID_COLS as usize];
        let cost = if BASE_COMPONENT_ROWS.contains(&row) {
            BASE_ROW_COST
        } else {
            option_cost(row)
        };
        if cost != 0.0 {
            cells[COST_COLUMN as usize - 1] = CellValue::Number(cost);
        }
        rows.push(cells);
    }
    CostGrid::from_rows(rows)
}

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an xlsx fixture whose Summary sheet carries the standard
    /// fixture costs as plain values, readable by the fast-read path.
    pub fn create_summary_workbook(&self, name: &str) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.new_sheet("Summary").expect("create Summary sheet");

        for &row in BASE_COMPONENT_ROWS {
            sheet
                .get_cell_mut((COST_COLUMN, row))
                .set_value_number(BASE_ROW_COST);
        }
        for &(row, label) in PRICED_ROWS {
            sheet.get_cell_mut((1u32, row)).set_value(label.to_string());
            sheet
                .get_cell_mut((COST_COLUMN, row))
                .set_value_number(option_cost(row));
        }
        sheet.get_cell_mut("M4").set_value_number(0.0);

        let path = self.dir.path().join(name);
        umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture workbook");
        path
    }
}
