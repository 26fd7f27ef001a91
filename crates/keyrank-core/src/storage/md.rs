//! Markdown export functionality

use crate::error::Result;
use crate::table::Table;
use keyrank_engine::engine::{CellValue, format_number};
use std::io::Write;

/// Write a table as a Markdown document with a `# {title}` heading.
pub fn write_markdown_to<W: Write>(mut out: W, table: &Table, title: &str) -> Result<()> {
    writeln!(out, "# {}", escape_markdown(title))?;
    writeln!(out)?;

    if table.header.is_empty() {
        writeln!(out, "*Empty table*")?;
        return Ok(());
    }

    let width = table.width();

    write!(out, "|")?;
    for col in 0..width {
        let name = table.header.get(col).map(String::as_str).unwrap_or("");
        write!(out, " {} |", escape_markdown(name))?;
    }
    writeln!(out)?;

    write!(out, "|")?;
    for _ in 0..width {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in 0..table.row_count() {
        write!(out, "|")?;
        for col in 0..width {
            write!(out, " {} |", escape_markdown(&display(table.cell(row, col))))?;
        }
        writeln!(out)?;
    }

    if table.is_empty() {
        writeln!(out)?;
        writeln!(out, "*No rows*")?;
    }

    Ok(())
}

fn display(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
    }
}

/// Escape pipes and flatten line breaks so each row stays on one line.
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        write_markdown_to(&mut out, table, "ranked").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_table() {
        let table = Table::with_rows(
            vec!["키워드".to_string(), "final_score".to_string()],
            vec![vec![CellValue::new_text("a|b"), CellValue::Number(1.0 / 3.0)]],
        );
        let content = render(&table);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# ranked");
        assert_eq!(lines[2], "| 키워드 | final_score |");
        assert_eq!(lines[3], "|---|---|");
        assert_eq!(lines[4], "| a\\|b | 0.33 |");
    }

    #[test]
    fn test_markdown_flattens_wrapped_headers() {
        let table = Table::new(vec!["최근\n30일\n검색량".to_string()]);
        let content = render(&table);
        assert!(content.contains("| 최근 30일 검색량 |"));
        assert!(content.contains("*No rows*"));
    }
}
