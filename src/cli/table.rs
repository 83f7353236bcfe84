use crate::cli::output::current_preferences;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment,
        }
    }

    pub fn capped(header: impl Into<String>, alignment: Alignment, max_width: usize) -> Self {
        Self {
            max_width: Some(max_width),
            ..Self::new(header, alignment)
        }
    }
}

/// A table with column metadata and rows of data to render.
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
    show_headers: bool,
    padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            show_headers: true,
            padding: 1,
        }
    }

    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width per column: the widest of the header, every cell and
    /// the configured minimum, clamped to the configured maximum.
    fn compute_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| visible_width(&column.header).max(column.min_width))
            .collect();
        for row in &self.rows {
            for (cell, width) in row.iter().zip(widths.iter_mut()) {
                *width = (*width).max(visible_width(cell));
            }
        }
        for (column, width) in self.columns.iter().zip(widths.iter_mut()) {
            if let Some(max_width) = column.max_width {
                *width = (*width).min(max_width);
            }
        }
        widths
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(cell, *width, column.alignment, self.padding)
            })
            .collect();
        cells.join(" ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let mut lines: Vec<String> = Vec::new();

        if self.show_headers {
            let headers: Vec<String> = self
                .columns
                .iter()
                .map(|column| column.header.clone())
                .collect();
            lines.push(self.render_row(&headers, &widths));
            lines.push(horizontal_rule(&widths, self.padding));
        }
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }
}

/// Character width of `text` with ANSI escape sequences skipped, so
/// colored cells line up with plain ones.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            if chars.peek() == Some(&'[') {
                chars.next();
                // Parameter bytes run until a final byte in `@`..=`~`.
                for follow in chars.by_ref() {
                    if ('@'..='~').contains(&follow) {
                        break;
                    }
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

/// Fits `text` into `width` visible characters, marking cut-off content
/// with a trailing `~`. Escape sequences are carried over unmetered and
/// closed with a reset so a truncated color span cannot bleed on.
fn truncate_text(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 1 {
        return "~".to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    let mut saw_ansi = false;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            saw_ansi = true;
            out.push(ch);
            out.push('[');
            chars.next();
            for follow in chars.by_ref() {
                out.push(follow);
                if ('@'..='~').contains(&follow) {
                    break;
                }
            }
            continue;
        }
        if used == width - 1 {
            break;
        }
        out.push(ch);
        used += 1;
    }

    out.push('~');
    if saw_ansi {
        out.push_str("\u{1b}[0m");
    }
    out
}

fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let fill = " ".repeat(width.saturating_sub(visible_width(&fitted)));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{fill}{pad}"),
        Alignment::Right => format!("{pad}{fill}{fitted}{pad}"),
    }
}

fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let gaps = widths.len() - 1;
    let total: usize = widths.iter().map(|width| width + padding * 2).sum::<usize>() + gaps;
    let dash = if current_preferences().plain_mode {
        '-'
    } else {
        '─'
    };
    dash.to_string().repeat(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_width_skips_ansi_sequences() {
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\u{1b}[31mred\u{1b}[0m"), 3);
    }

    #[test]
    fn truncates_and_marks_overflow() {
        assert_eq!(truncate_text("Weyermann Pilsner", 9), "Weyerman~");
        assert_eq!(truncate_text("ok", 5), "ok");
    }

    #[test]
    fn truncated_color_spans_are_reset() {
        let cut = truncate_text("\u{1b}[32mWeyermann Pilsner\u{1b}[0m", 9);
        assert!(cut.starts_with("\u{1b}[32mWeyerman"));
        assert!(cut.ends_with("~\u{1b}[0m"));
        assert_eq!(visible_width(&cut), 9);
    }

    #[test]
    fn right_alignment_pads_on_the_left() {
        assert_eq!(render_cell("42", 4, Alignment::Right, 1), "   42 ");
        assert_eq!(render_cell("42", 4, Alignment::Left, 1), " 42   ");
    }

    #[test]
    fn renders_headers_rule_and_rows() {
        let mut table = Table::new(vec![
            TableColumn::new("Id", Alignment::Right),
            TableColumn::new("Name", Alignment::Left),
        ]);
        table.push_row(vec!["1".into(), "Pilsen".into()]);
        table.push_row(vec!["12".into(), "Saaz".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Id"));
        assert!(lines[0].contains("Name"));
        assert!(lines[2].contains("Pilsen"));
        assert!(lines[3].trim_start().starts_with("12"));
    }

    #[test]
    fn headerless_table_renders_rows_only() {
        let mut table = Table::new(vec![
            TableColumn::new("", Alignment::Left),
            TableColumn::new("", Alignment::Right),
        ])
        .without_headers();
        table.push_row(vec!["Subtotal".into(), "46,00".into()]);

        assert_eq!(table.render().lines().count(), 1);
    }
}
