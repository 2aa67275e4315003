//! Renders a [`ReportTable`] as CSV bytes or a printable HTML document.

use std::fmt::Write as _;

use crate::ReportError;
use crate::table::ReportTable;

/// Writes `table` as CSV. The header row is always present, even when the
/// table has no data rows. The title is not part of the CSV.
///
/// # Errors
///
/// Returns [`ReportError`] if the CSV writer fails.
pub fn to_csv(table: &ReportTable) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

/// Writes `table` as a CSV string.
///
/// # Errors
///
/// Returns [`ReportError`] if the CSV writer fails.
pub fn to_csv_string(table: &ReportTable) -> Result<String, ReportError> {
    Ok(String::from_utf8(to_csv(table)?)?)
}

/// Renders `table` as a standalone HTML document for printing.
#[must_use]
pub fn to_html(table: &ReportTable) -> String {
    let title = escape_html(&table.title);
    let mut html = String::with_capacity(512 + table.rows.len() * 128);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #444; padding: 4px 8px; text-align: left; }\n\
         th { background: #eee; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str("<table>\n<thead>\n<tr>");
    for header in &table.headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
