use serde::{Deserialize, Serialize};
use umya_spreadsheet::Worksheet;

/// Bounded snapshot region of the Summary sheet: rows 1..=48 cover every
/// input flag and priced row, columns A..J end at the cost column.
pub const GRID_ROWS: u32 = 48;
pub const GRID_COLS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            Self::Empty => 0.0,
        }
    }
}

/// Fixed-shape rectangular snapshot of computed cells. Construction
/// truncates oversized sources; indices are 1-based like cell addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGrid {
    rows: Vec<Vec<CellValue>>,
}

impl CostGrid {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let rows = rows
            .into_iter()
            .take(GRID_ROWS as usize)
            .map(|mut row| {
                row.truncate(GRID_COLS as usize);
                row
            })
            .collect();
        Self { rows }
    }

    pub fn from_sheet(sheet: &Worksheet) -> Self {
        let mut rows = Vec::with_capacity(GRID_ROWS as usize);
        for row in 1..=GRID_ROWS {
            let mut cells = Vec::with_capacity(GRID_COLS as usize);
            for col in 1..=GRID_COLS {
                cells.push(read_cell(sheet, col, row));
            }
            rows.push(cells);
        }
        Self { rows }
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn col_count(&self) -> u32 {
        self.rows.first().map(|r| r.len() as u32).unwrap_or(0)
    }

    /// Value at a 1-based (row, col) position; out-of-bounds reads are empty.
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        if row == 0 || col == 0 {
            return &CellValue::Empty;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&CellValue::Empty)
    }

    pub fn number(&self, row: u32, col: u32) -> f64 {
        self.value(row, col).as_number()
    }
}

fn read_cell(sheet: &Worksheet, col: u32, row: u32) -> CellValue {
    let Some(cell) = sheet.get_cell((col, row)) else {
        return CellValue::Empty;
    };
    let raw = cell.get_value();
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match raw.trim().parse::<f64>() {
        Ok(n) => CellValue::Number(n),
        Err(_) => CellValue::Text(raw.to_string()),
    }
}
