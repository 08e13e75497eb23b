//! Flat text export of a priced build.
//!
//! Layout: the build name on its own line, a header row, one tab-separated
//! row per line item, then the total row.

use std::io::Write;

use crate::BuildSummary;

pub const HEADER: [&str; 5] = ["Код", "Артикул", "Наименование", "Кол-во", "Цена"];
pub const TOTAL_LABEL: &str = "Итого";

/// Quantity written for every row; kits are already expanded into rows
const ROW_QUANTITY: &str = "1";

pub fn write_export<W: Write>(summary: &BuildSummary, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record([summary.build_name.as_str()])?;
    out.write_record(HEADER)?;

    for item in &summary.line_items {
        let price = item.price.to_string();
        out.write_record([
            item.code.as_deref().unwrap_or_default(),
            item.article.as_deref().unwrap_or_default(),
            item.name.as_str(),
            ROW_QUANTITY,
            price.as_str(),
        ])?;
    }

    let total = summary.grand_total.to_string();
    out.write_record(["", "", TOTAL_LABEL, "", total.as_str()])?;
    out.flush()?;
    Ok(())
}

/// Export rendered into a string
pub fn export_string(summary: &BuildSummary) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_export(summary, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
