use crate::errors::ProcessError;
use umya_spreadsheet::{PatternValues, Spreadsheet};

/// A validated highlight color, stored as 8-digit ARGB hex.
///
/// Accepts `RRGGBB` or `AARRGGBB`, with or without a leading `#`. Validation
/// happens before any file I/O so a bad color fails the task immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightColor {
    argb: String,
}

impl HighlightColor {
    pub fn parse(input: &str) -> Result<Self, ProcessError> {
        let hex = input.trim().trim_start_matches('#');
        let valid_len = hex.len() == 6 || hex.len() == 8;
        if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ProcessError::InvalidColor(input.to_string()));
        }

        let mut argb = String::with_capacity(8);
        if hex.len() == 6 {
            argb.push_str("FF");
        }
        argb.push_str(&hex.to_ascii_uppercase());
        Ok(Self { argb })
    }

    pub fn argb(&self) -> &str {
        &self.argb
    }
}

/// Apply a solid fill to every cell of the physical row `row` in the named
/// sheet, across the sheet's occupied column span.
///
/// Re-highlighting an already highlighted row just sets the same fill again.
/// Missing sheets are ignored; the matcher only emits locations it read from
/// this same book.
pub fn highlight_row(book: &mut Spreadsheet, sheet_name: &str, row: u32, color: &HighlightColor) {
    let Some(sheet) = book.get_sheet_by_name_mut(sheet_name) else {
        return;
    };

    let max_col = sheet.get_highest_column();
    for col in 1..=max_col {
        sheet
            .get_style_mut((col, row))
            .get_fill_mut()
            .get_pattern_fill_mut()
            .set_pattern_type(PatternValues::Solid)
            .get_foreground_color_mut()
            .set_argb(color.argb());
    }
}
