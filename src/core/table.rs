use crate::domain::model::Table;
use crate::utils::error::{DashError, Result};
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DashError::processing(format!("bad selector '{}': {}", css, e)))
}

/// Visible text of a cell with runs of whitespace collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns one rendered `<table>` into a [`Table`].
///
/// Headers are every `th` in the table; each `tr` with `td` cells becomes a row.
/// A table with no headers or no data rows yields an empty table.
pub fn extract_table_data(html: &str) -> Result<Table> {
    let fragment = Html::parse_fragment(html);
    let th = selector("th")?;
    let tr = selector("tr")?;
    let td = selector("td")?;

    let headers: Vec<String> = fragment.select(&th).map(cell_text).collect();

    let rows: Vec<Vec<String>> = fragment
        .select(&tr)
        .map(|row| row.select(&td).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    if headers.is_empty() || rows.is_empty() {
        tracing::debug!(
            "Table has {} headers and {} data rows, treating as empty",
            headers.len(),
            rows.len()
        );
        return Ok(Table::empty());
    }

    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != headers.len())
    {
        return Err(DashError::processing(format!(
            "table row {} has {} cells but the header has {} columns",
            index + 1,
            row.len(),
            headers.len()
        )));
    }

    Ok(Table::new(headers, rows))
}
