use serde_json::Value;

/// Left-aligned plain text table with a dashed rule under the header.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_row = |cells: &[String]| -> String {
            let line = (0..columns)
                .map(|i| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    let pad = widths[i].saturating_sub(cell.chars().count());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ");
            line.trim_end().to_string()
        };

        let mut lines = vec![format_row(&self.headers)];
        let rule_width = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
        lines.push("-".repeat(rule_width));
        lines.extend(self.rows.iter().map(|row| format_row(row)));
        lines.join("\n")
    }
}

/// Display form of a raw cell in the preview table.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = TextTable::new(["Month", "Amount"]);
        table.push_row(vec!["2024-01-31".to_string(), "1200.00".to_string()]);
        table.push_row(vec!["2024-02-29".to_string(), "5.00".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Month       Amount");
        assert_eq!(lines[1], "-".repeat(19));
        assert_eq!(lines[2], "2024-01-31  1200.00");
        assert_eq!(lines[3], "2024-02-29  5.00");
    }

    #[test]
    fn test_render_counts_chars_not_bytes() {
        let mut table = TextTable::new(["Sales", "X"]);
        table.push_row(vec!["₹1,200".to_string(), "a".to_string()]);

        let rendered = table.render();
        assert!(rendered.lines().nth(2).unwrap().starts_with("₹1,200  a"));
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(&Value::Null), "");
        assert_eq!(display_cell(&Value::from("abc")), "abc");
        assert_eq!(display_cell(&Value::from(12)), "12");
        assert_eq!(money(1234.5), "1234.50");
    }
}
