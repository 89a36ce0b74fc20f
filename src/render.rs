/// Text rendering of record batches for the CLI
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};

use crate::core::Result;

/// Render a batch as a table, one header cell per field (name and Arrow
/// type) followed by a row count line.
pub fn render_batch(batch: &RecordBatch) -> Result<String> {
    if batch.num_rows() == 0 {
        return Ok("(0 rows)\n".to_string());
    }

    let options = FormatOptions::default().with_null("NULL");
    let formatters = batch
        .columns()
        .iter()
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        batch
            .schema()
            .fields()
            .iter()
            .map(|field| Cell::new(format!("{}\n{}", field.name(), field.data_type()))),
    );

    for row in 0..batch.num_rows() {
        table.add_row(formatters.iter().map(|f| Cell::new(f.value(row))));
    }

    Ok(format!("{table}\n({} rows)\n", batch.num_rows()))
}
