use crate::errors::ProcessError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// One sheet interpreted as a table: named columns from the header row,
/// ordered data rows below it.
///
/// Column positions are resolved once here so that matching never has to
/// recompute them per cell. `row` values are physical row numbers in the
/// source grid, which is what the highlight renderer operates on.
#[derive(Debug, Clone)]
pub struct TabularSheet {
    pub name: String,
    pub header_row: u32,
    /// Column name -> physical (1-based) column index, in declaration order.
    /// A duplicate header keeps its first occurrence.
    pub columns: IndexMap<String, u32>,
    pub rows: Vec<DataRow>,
}

#[derive(Debug, Clone)]
pub struct DataRow {
    /// Physical row number in the source grid.
    pub row: u32,
    /// Trimmed cell values, parallel to `columns`. A missing cell is "".
    pub values: Vec<String>,
}

impl TabularSheet {
    pub fn column_slot(&self, column: &str) -> Option<usize> {
        self.columns.get_index_of(column)
    }
}

/// A workbook loaded twice over: as tabular views for matching and as the
/// mutable umya spreadsheet the highlight renderer writes fills into.
pub struct LoadedWorkbook {
    pub path: PathBuf,
    pub sheets: Vec<TabularSheet>,
    pub book: Spreadsheet,
}

impl std::fmt::Debug for LoadedWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedWorkbook")
            .field("path", &self.path)
            .field("sheets", &self.sheets)
            .finish_non_exhaustive()
    }
}

impl LoadedWorkbook {
    /// True when the named column appears in at least one sheet.
    pub fn has_column(&self, column: &str) -> bool {
        self.sheets.iter().any(|s| s.columns.contains_key(column))
    }
}

/// Load a workbook from `path`, interpreting 1-based row `header_row` of
/// every sheet as its column names and the rows below as data.
///
/// Fails when the file cannot be parsed or when `header_row` lies beyond a
/// sheet's last occupied row.
pub fn load(path: &Path, header_row: u32) -> Result<LoadedWorkbook, ProcessError> {
    if header_row == 0 {
        return Err(ProcessError::load(path, "header row must be 1-based"));
    }

    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| ProcessError::load(path, format!("not a readable spreadsheet: {e}")))?;

    let sheet_collection = book.get_sheet_collection_no_check();
    let mut sheets = Vec::with_capacity(sheet_collection.len());
    for sheet in sheet_collection {
        sheets.push(tabular_view(sheet, header_row).map_err(|reason| {
            ProcessError::load(path, format!("sheet '{}': {reason}", sheet.get_name()))
        })?);
    }

    Ok(LoadedWorkbook {
        path: path.to_path_buf(),
        sheets,
        book,
    })
}

fn tabular_view(sheet: &Worksheet, header_row: u32) -> Result<TabularSheet, String> {
    let max_row = sheet.get_highest_row();
    let max_col = sheet.get_highest_column();

    if header_row > max_row {
        return Err(format!(
            "header row {header_row} is beyond the last occupied row ({max_row})"
        ));
    }

    let mut columns: IndexMap<String, u32> = IndexMap::new();
    for col in 1..=max_col {
        let name = cell_text(sheet, col, header_row);
        if name.is_empty() {
            continue;
        }
        columns.entry(name).or_insert(col);
    }

    let mut rows = Vec::new();
    for row in (header_row + 1)..=max_row {
        let values = columns
            .values()
            .map(|&col| cell_text(sheet, col, row))
            .collect();
        rows.push(DataRow { row, values });
    }

    Ok(TabularSheet {
        name: sheet.get_name().to_string(),
        header_row,
        columns,
        rows,
    })
}

fn cell_text(sheet: &Worksheet, col: u32, row: u32) -> String {
    sheet
        .get_cell((col, row))
        .map(|cell| cell.get_value().trim().to_string())
        .unwrap_or_default()
}
