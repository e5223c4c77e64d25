//! Plain-text tables for the terminal.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use stockroom_query::{ListPage, Record};

use crate::config::ColumnConfig;

/// Widest a column may grow before cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 32;

const GAP: &str = "  ";

/// A table of text cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row. Missing trailing cells render empty, extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| measure_text_width(&row[i]))
                    .chain(std::iter::once(measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Renders the header, a rule and every row, each line ending in `\n`.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            if measure_text_width(cell) > *width {
                let cell = truncate_str(cell, *width, "…");
                pad_str(&cell, *width, Alignment::Left, None).into_owned()
            } else {
                pad_str(cell, *width, Alignment::Left, None).into_owned()
            }
        })
        .collect();
    out.push_str(line.join(GAP).trim_end());
    out.push('\n');
}

/// `Page X of Y (N matching)`
pub fn page_footer<T>(page: &ListPage<'_, T>) -> String {
    format!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total_matching
    )
}

/// Renders one page of records as a table over `columns`, followed by the
/// page footer. Without columns, `fallback` names the fields to show.
pub fn page_table<T: Record>(
    page: &ListPage<'_, T>,
    columns: &[ColumnConfig],
    fallback: &[&str],
) -> String {
    let (headers, fields): (Vec<&str>, Vec<&str>) = if columns.is_empty() {
        fallback.iter().map(|f| (*f, *f)).unzip()
    } else {
        columns
            .iter()
            .map(|c| (c.header.as_str(), c.field.as_str()))
            .unzip()
    };

    let mut out = String::new();
    if page.is_empty() {
        out.push_str("No records found.\n");
    } else {
        let mut table = Table::new(headers);
        for item in &page.items {
            table.row(fields.iter().map(|f| {
                item.field_value(f)
                    .to_text()
                    .map(|t| t.into_owned())
                    .unwrap_or_default()
            }));
        }
        out.push_str(&table.render());
    }
    out.push_str(&page_footer(page));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};
    use stockroom_query::{Dir, ListQuery};

    #[test]
    fn aligns_columns() {
        let mut table = Table::new(["Name", "Qty"]);
        table.row(["Rice", "5"]);
        table.row(["Olive Oil", "12"]);
        assert_eq!(
            table.render(),
            "Name       Qty\n---------  ---\nRice       5\nOlive Oil  12\n"
        );
    }

    #[test]
    fn pads_short_rows() {
        let mut table = Table::new(["A", "B"]);
        table.row(["x"]);
        assert_eq!(table.render(), "A  B\n-  -\nx\n");
    }

    #[test]
    fn keeps_cells_that_fill_the_column() {
        let mut table = Table::new(["Qty"]);
        table.row(["12"]);
        assert_eq!(table.render(), "Qty\n---\n12\n");

        let mut table = Table::new(["Name"]);
        table.row(["x".repeat(MAX_COLUMN_WIDTH)]);
        let rendered = table.render();
        let last = rendered.lines().last().unwrap_or_default();
        assert_eq!(last, "x".repeat(MAX_COLUMN_WIDTH));
    }

    #[test]
    fn truncates_wide_cells() {
        let mut table = Table::new(["Name"]);
        table.row(["x".repeat(40)]);
        let rendered = table.render();
        let last = rendered.lines().last().unwrap_or_default();
        assert_eq!(measure_text_width(last), MAX_COLUMN_WIDTH);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn page_with_footer() {
        let records: Vec<Json> = vec![
            json!({"name": "Rice", "price": "20"}),
            json!({"name": "Oil", "price": "9"}),
            json!({"name": "Salt", "price": "100"}),
        ];
        let page = ListQuery::new()
            .sort_by("price", Dir::Ascending)
            .page(1, 2)
            .execute(&records)
            .unwrap();
        let columns = vec![
            ColumnConfig {
                header: "Product".into(),
                field: "name".into(),
            },
            ColumnConfig {
                header: "Price".into(),
                field: "price".into(),
            },
        ];

        assert_eq!(
            page_table(&page, &columns, &[]),
            "Product  Price\n-------  -----\nOil      9\nRice     20\nPage 1 of 2 (3 matching)\n"
        );
    }

    #[test]
    fn empty_page() {
        let records: Vec<Json> = Vec::new();
        let page = ListQuery::new().execute(&records).unwrap();
        assert_eq!(
            page_table(&page, &[], &["name"]),
            "No records found.\nPage 1 of 1 (0 matching)\n"
        );
    }
}
