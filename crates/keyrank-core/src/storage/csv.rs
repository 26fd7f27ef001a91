//! CSV import/export functionality

use crate::error::{KeyrankError, Result};
use crate::table::Table;
use keyrank_engine::engine::CellValue;
use std::io::{Read, Write};
use std::path::Path;

/// Read a CSV file into a [`Table`]. The first record is the header.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

/// Read CSV from any reader.
///
/// Quoted fields may span lines, so wrapped spreadsheet headers such as
/// `"최근\n30일\n검색량"` survive intact. Records may be shorter or longer
/// than the header.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let Some(first) = records.next() else {
        return Err(KeyrankError::EmptyTable);
    };
    let first = first?;
    let header = first
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut table = Table::new(header);
    for record in records {
        let record = record?;
        table.push_row(record.iter().map(CellValue::from_field).collect());
    }
    Ok(table)
}

/// Write a table as CSV.
pub fn write_csv_to<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(table.header.iter().map(|h| guard_formula(h)))?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(render_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Numbers are written as-is; only text can carry a formula.
fn render_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => guard_formula(s),
        other => other.to_field_string(),
    }
}

/// Guard against CSV formula injection in spreadsheet apps.
fn guard_formula(field: &str) -> String {
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Table {
        read_csv_from(content.as_bytes()).unwrap()
    }

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        write_csv_to(&mut out, table).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_simple() {
        let table = parse("a,b,c\n1,x,\n");
        assert_eq!(table.header, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::Number(1.0),
                CellValue::new_text("x"),
                CellValue::Empty
            ]
        );
    }

    #[test]
    fn test_read_quoted_header_with_newlines() {
        let table = parse("키워드,\"최근\n30일\n검색량\",\"네이버\n경쟁강도\"\nabc,\"8,000\",1\n");
        assert_eq!(table.header[1], "최근\n30일\n검색량");
        assert_eq!(table.header[2], "네이버\n경쟁강도");
        assert_eq!(table.rows[0][1], CellValue::new_text("8,000"));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_read_strips_bom() {
        let table = parse("\u{feff}keyword,volume\nx,1\n");
        assert_eq!(table.header[0], "keyword");
    }

    #[test]
    fn test_read_ragged_rows() {
        let table = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_read_header_only() {
        let table = parse("a,b\n");
        assert!(table.is_empty());
    }

    #[test]
    fn test_read_empty_input_is_an_error() {
        assert!(matches!(
            read_csv_from("".as_bytes()),
            Err(KeyrankError::EmptyTable)
        ));
    }

    #[test]
    fn test_write_numbers_and_quoting() {
        let table = Table::with_rows(
            vec!["name".to_string(), "score".to_string()],
            vec![vec![CellValue::new_text("hello, world"), CellValue::Number(4000.0)]],
        );
        assert_eq!(render(&table), "name,score\n\"hello, world\",4000\n");
    }

    #[test]
    fn test_write_multiline_header_round_trips() {
        let table = Table::new(vec!["최근\n30일\n검색량".to_string()]);
        let content = render(&table);
        assert_eq!(parse(&content).header, table.header);
    }

    #[test]
    fn test_guard_formula_injection() {
        assert_eq!(guard_formula("simple"), "simple");
        assert_eq!(guard_formula(" =1+1"), "' =1+1");
        assert_eq!(guard_formula("\t-2+3"), "'\t-2+3");
        assert_eq!(guard_formula(" \t@cmd"), "' \t@cmd");
    }

    #[test]
    fn test_negative_numbers_are_not_guarded() {
        let table = Table::with_rows(
            vec!["n".to_string()],
            vec![vec![CellValue::Number(-0.5)], vec![CellValue::new_text("-x")]],
        );
        assert_eq!(render(&table), "n\n-0.5\n'-x\n");
    }
}
