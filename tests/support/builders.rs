#![allow(dead_code)]
use umya_spreadsheet::Worksheet;

#[derive(Clone, Debug)]
pub enum CellVal {
    Text(String),
    Num(f64),
    Empty,
}

impl From<&str> for CellVal {
    fn from(s: &str) -> Self {
        CellVal::Text(s.to_string())
    }
}

impl From<f64> for CellVal {
    fn from(n: f64) -> Self {
        CellVal::Num(n)
    }
}

impl From<i32> for CellVal {
    fn from(n: i32) -> Self {
        CellVal::Num(n as f64)
    }
}

fn set_cell(sheet: &mut Worksheet, col: u32, row: u32, val: &CellVal) {
    match val {
        CellVal::Text(s) => {
            sheet.get_cell_mut((col, row)).set_value(s.clone());
        }
        CellVal::Num(n) => {
            sheet.get_cell_mut((col, row)).set_value_number(*n);
        }
        CellVal::Empty => {}
    }
}

/// Fill a header row plus data rows, starting at column 1 of `header_row`.
pub fn fill_table<H, R, V>(sheet: &mut Worksheet, header_row: u32, headers: &[H], rows: &[R])
where
    H: AsRef<str>,
    R: AsRef<[V]>,
    V: Into<CellVal> + Clone,
{
    for (i, header) in headers.iter().enumerate() {
        sheet
            .get_cell_mut((1 + i as u32, header_row))
            .set_value(header.as_ref().to_string());
    }

    for (row_idx, row_data) in rows.iter().enumerate() {
        let row = header_row + 1 + row_idx as u32;
        for (col_idx, val) in row_data.as_ref().iter().enumerate() {
            let cell_val: CellVal = val.clone().into();
            set_cell(sheet, 1 + col_idx as u32, row, &cell_val);
        }
    }
}
