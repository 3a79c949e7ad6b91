use chrono::NaiveDateTime;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

/// Group labeled lines into sections following `order`. Buckets absent
/// from `order` are dropped and empty sections are omitted; the input
/// order of lines within a bucket is preserved.
pub fn sections<C: PartialEq + Copy>(items: &[(C, String)], order: &[(C, &str)]) -> Vec<Section> {
    order
        .iter()
        .filter_map(|(category, title)| {
            let lines = items
                .iter()
                .filter(|(item_category, _)| item_category == category)
                .map(|(_, line)| line.clone())
                .collect_vec();
            (!lines.is_empty()).then(|| Section {
                title: (*title).to_string(),
                lines,
            })
        })
        .collect_vec()
}

/// Assemble a message body: header, sections (or an explicit no-data
/// body), and the data freshness footer
pub fn render(
    header: &str,
    sections: &[Section],
    empty_body: &str,
    last_sync: Option<NaiveDateTime>,
) -> String {
    let mut blocks = vec![header.to_string()];
    if sections.is_empty() {
        blocks.push(empty_body.to_string());
    }
    for section in sections {
        let mut block = format!("{}:", section.title);
        for line in &section.lines {
            block.push_str(&format!("\n - {line}"));
        }
        blocks.push(block);
    }
    blocks.push(format!("📊 Data as of: {}", format_sync(last_sync)));
    blocks.join("\n\n")
}

pub fn format_sync(last_sync: Option<NaiveDateTime>) -> String {
    last_sync
        .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Compact `"Ivanov Ivan Ivanovich"` to `"Ivanov I.I."`. Names with
/// fewer than three components pass through unchanged.
pub fn compact_name(full_name: &str) -> String {
    let parts = full_name.split_whitespace().collect_vec();
    match parts.as_slice() {
        [family, first, patronymic, ..] => {
            let initials: String = [first, patronymic]
                .iter()
                .filter_map(|part| part.chars().next())
                .map(|initial| format!("{initial}."))
                .collect();
            format!("{family} {initials}")
        }
        _ => full_name.to_string(),
    }
}

/// Hard wrap at `width` characters, unicode-safe
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    text.chars()
        .collect_vec()
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .join("\n")
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TableRow {
    pub category: String,
    pub name: String,
    pub date: String,
}

/// Fixed-width table body for the categorized view, meant for a
/// monospace (`<pre>`) block. Names wrap at `name_width`; continuation
/// lines keep the other columns empty.
pub fn table(rows: &[TableRow], name_width: usize) -> String {
    let wrapped = rows
        .iter()
        .map(|row| {
            (
                row.category.as_str(),
                wrap_text(&row.name, name_width),
                row.date.as_str(),
            )
        })
        .collect_vec();
    let category_width = wrapped
        .iter()
        .map(|(category, ..)| category.chars().count())
        .max()
        .unwrap_or(0);
    let name_col_width = wrapped
        .iter()
        .flat_map(|(_, name, _)| name.lines().map(|line| line.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (category, name, date) in &wrapped {
        let mut lines = name.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!(
            "{category:<category_width$}  {first:<name_col_width$}  {date}\n"
        ));
        for continuation in lines {
            out.push_str(&format!("{:<category_width$}  {continuation}\n", ""));
        }
    }
    out.pop();
    out
}

/// Escape a body destined for an HTML-parse-mode message
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
