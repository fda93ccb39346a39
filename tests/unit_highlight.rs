mod support;

use assert_matches::assert_matches;
use crossmark::errors::ProcessError;
use crossmark::highlight::{HighlightColor, highlight_row};
use support::builders::fill_table;
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::structs::EnumTrait;

fn fill_of(sheet: &Worksheet, col: u32, row: u32) -> Option<(String, String)> {
    let pattern = sheet.get_cell((col, row))?.get_style().get_fill()?.get_pattern_fill()?;
    let kind = pattern.get_pattern_type().get_value_string().to_string();
    let argb = pattern
        .get_foreground_color()
        .map(|c| c.get_argb().to_string())?;
    Some((kind, argb))
}

#[test]
fn parses_six_digit_hex_with_or_without_hash() {
    assert_eq!(HighlightColor::parse("FF0000").unwrap().argb(), "FFFF0000");
    assert_eq!(HighlightColor::parse("#ff0000").unwrap().argb(), "FFFF0000");
    assert_eq!(HighlightColor::parse("  #AbCdEf ").unwrap().argb(), "FFABCDEF");
}

#[test]
fn parses_eight_digit_argb_unchanged() {
    assert_eq!(HighlightColor::parse("80FF0000").unwrap().argb(), "80FF0000");
}

#[test]
fn rejects_malformed_colors() {
    for bad in ["", "red", "FFF", "F000000", "GGHHII", "#12345G"] {
        assert_matches!(
            HighlightColor::parse(bad).unwrap_err(),
            ProcessError::InvalidColor(_)
        );
    }
}

#[test]
fn highlights_every_cell_of_the_row() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    fill_table(sheet, 1, &["ID", "Name", "Qty"], &[["1", "a", "2"], ["2", "b", "3"]]);

    let color = HighlightColor::parse("FFFF00").unwrap();
    highlight_row(&mut book, "Sheet1", 2, &color);

    let sheet = book.get_sheet_by_name("Sheet1").unwrap();
    for col in 1..=3 {
        let (kind, argb) = fill_of(sheet, col, 2).expect("row 2 cell should carry a fill");
        assert_eq!(kind, "solid");
        assert_eq!(argb, "FFFFFF00");
    }
    // Neighboring rows are untouched.
    assert!(fill_of(sheet, 1, 1).is_none());
    assert!(fill_of(sheet, 1, 3).is_none());
}

#[test]
fn rehighlighting_is_idempotent() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    fill_table(sheet, 1, &["ID"], &[["1"]]);

    let color = HighlightColor::parse("00FF00").unwrap();
    highlight_row(&mut book, "Sheet1", 2, &color);
    highlight_row(&mut book, "Sheet1", 2, &color);

    let sheet = book.get_sheet_by_name("Sheet1").unwrap();
    let (kind, argb) = fill_of(sheet, 1, 2).unwrap();
    assert_eq!(kind, "solid");
    assert_eq!(argb, "FF00FF00");
}

#[test]
fn unknown_sheet_is_ignored() {
    let mut book = umya_spreadsheet::new_file();
    let color = HighlightColor::parse("FF0000").unwrap();
    highlight_row(&mut book, "NoSuchSheet", 1, &color);
}
