use crate::loader::TabularSheet;

/// One matched pair of rows: a workbook-A row and the first workbook-B row
/// whose designated-column value string-equals it. Physical row numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    pub source_sheet: String,
    pub source_row: u32,
    pub target_sheet: String,
    pub target_row: u32,
}

/// The result of scanning one workbook-A sheet against all of workbook B.
///
/// Sheets that lack the designated column produce an empty pass but still
/// advance `processed`, so progress counts every A sheet.
#[derive(Debug, Clone)]
pub struct SheetPass {
    pub sheet_name: String,
    pub matches: Vec<MatchPair>,
    pub processed: usize,
    pub total: usize,
}

impl SheetPass {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}

/// Cross-reference matcher: an iterator of per-A-sheet passes.
///
/// For each data row of an eligible A sheet, B sheets are scanned in
/// declaration order and rows within a sheet in order; the first equal value
/// wins and scanning stops for that A row. Empty B values are never match
/// candidates, so an empty A value never matches.
///
/// The scan is O(|A rows| x |B rows|) per pass on purpose: workloads here are
/// interactive uploads, and the unindexed scan keeps first-sheet-first-row
/// tie-breaking trivially deterministic.
pub struct Matcher<'a> {
    a_sheets: &'a [TabularSheet],
    b_sheets: &'a [TabularSheet],
    column_a: &'a str,
    column_b: &'a str,
    next: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(
        a_sheets: &'a [TabularSheet],
        b_sheets: &'a [TabularSheet],
        column_a: &'a str,
        column_b: &'a str,
    ) -> Self {
        Self {
            a_sheets,
            b_sheets,
            column_a,
            column_b,
            next: 0,
        }
    }

    fn find_in_b(&self, value: &str) -> Option<(&'a str, u32)> {
        for b_sheet in self.b_sheets {
            let Some(slot) = b_sheet.column_slot(self.column_b) else {
                continue;
            };
            for row in &b_sheet.rows {
                let candidate = row.values[slot].as_str();
                if candidate.is_empty() {
                    continue;
                }
                if candidate == value {
                    return Some((b_sheet.name.as_str(), row.row));
                }
            }
        }
        None
    }
}

impl Iterator for Matcher<'_> {
    type Item = SheetPass;

    fn next(&mut self) -> Option<SheetPass> {
        let a_sheet = self.a_sheets.get(self.next)?;
        self.next += 1;

        let mut matches = Vec::new();
        if let Some(slot) = a_sheet.column_slot(self.column_a) {
            for row in &a_sheet.rows {
                let value = row.values[slot].as_str();
                if let Some((target_sheet, target_row)) = self.find_in_b(value) {
                    matches.push(MatchPair {
                        source_sheet: a_sheet.name.clone(),
                        source_row: row.row,
                        target_sheet: target_sheet.to_string(),
                        target_row,
                    });
                }
            }
        }

        Some(SheetPass {
            sheet_name: a_sheet.name.clone(),
            matches,
            processed: self.next,
            total: self.a_sheets.len(),
        })
    }
}
