use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::core::{ConvertError, Result, ValueError};
use crate::mapping::ColumnarSchema;
use crate::source::RowCursor;
use super::column_buffer::ColumnBuffer;

/// Initial buffer capacity when the caller gives no row limit
const DEFAULT_CAPACITY: usize = 1024;

/// Drain up to `max_rows` rows from `cursor` into one `RecordBatch`.
///
/// Buffers for every field are allocated before the first row is read and
/// grow in lockstep. Row indices in errors are relative to this batch. On any
/// error the partially filled buffers are dropped and nothing is returned.
pub fn materialize<C: RowCursor + ?Sized>(
    schema: &ColumnarSchema,
    cursor: &mut C,
    max_rows: Option<usize>,
) -> Result<RecordBatch> {
    let capacity = max_rows.map_or(DEFAULT_CAPACITY, |m| m.min(DEFAULT_CAPACITY));
    let mut buffers = schema
        .descriptors()
        .iter()
        .map(|descriptor| ColumnBuffer::new(&descriptor.logical_type, capacity))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut row_count = 0;
    while max_rows.is_none_or(|limit| row_count < limit) {
        let row = match cursor.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(cause) => {
                return Err(ConvertError::SourceExhaustedPrematurely { row: row_count, cause });
            }
        };

        for (descriptor, buffer) in schema.descriptors().iter().zip(buffers.iter_mut()) {
            let appended = match row.get(descriptor.source_index) {
                None => Err(ValueError::MissingColumn(descriptor.source_index)),
                Some(value) if value.is_null() && !descriptor.nullable => {
                    Err(ValueError::UnexpectedNull)
                }
                Some(value) => buffer.append(value, &descriptor.logical_type),
            };
            appended.map_err(|cause| ConvertError::ConversionFailed {
                row: row_count,
                field: descriptor.name.clone(),
                cause,
            })?;
        }
        row_count += 1;
    }

    let columns = buffers.iter_mut().map(ColumnBuffer::finish).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(row_count));
    Ok(RecordBatch::try_new_with_options(schema.arrow_schema(), columns, &options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnMetadata, Row, SqlType, Table, Value};
    use crate::mapping::TypeMapper;
    use crate::source::RowSource;
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::{Int32Type, Int8Type};

    fn people(rows: usize) -> Table {
        let mut table = Table::new(
            "people",
            vec![
                ColumnMetadata::new("id", SqlType::Integer).not_null(),
                ColumnMetadata::new("name", SqlType::Varchar),
            ],
        );
        for i in 0..rows {
            let name = if i % 2 == 0 { Value::Text(format!("p{i}")) } else { Value::Null };
            table.insert(vec![Value::Integer(i32::try_from(i).unwrap()), name]).unwrap();
        }
        table
    }

    #[test]
    fn test_row_count_is_min_of_rows_and_limit() {
        let mut table = people(7);
        let schema = TypeMapper::default().map(&table.columns).unwrap();

        for (limit, expected) in [(None, 7), (Some(3), 3), (Some(7), 7), (Some(20), 7), (Some(0), 0)] {
            let mut cursor = table.execute(None).unwrap();
            let batch = materialize(&schema, &mut *cursor, limit).unwrap();
            assert_eq!(batch.num_rows(), expected, "limit {limit:?}");
            for column in batch.columns() {
                assert_eq!(column.len(), expected);
            }
        }
    }

    #[test]
    fn test_null_positions_preserved() {
        let mut table = people(4);
        let schema = TypeMapper::default().map(&table.columns).unwrap();
        let mut cursor = table.execute(None).unwrap();
        let batch = materialize(&schema, &mut *cursor, None).unwrap();

        let ids = batch.column(0).as_primitive::<Int32Type>();
        assert_eq!(ids.values().to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(ids.null_count(), 0);

        let names = batch.column(1).as_string::<i32>();
        assert_eq!(names.value(0), "p0");
        assert!(names.is_null(1));
        assert_eq!(names.value(2), "p2");
        assert!(names.is_null(3));
    }

    #[test]
    fn test_out_of_range_discards_batch() {
        let mut table = Table::new("t", vec![ColumnMetadata::new("small", SqlType::TinyInt)]);
        table.insert(vec![Value::Integer(1)]).unwrap();
        table.insert(vec![Value::Integer(300)]).unwrap();
        let schema = TypeMapper::default().map(&table.columns).unwrap();
        assert_eq!(schema.descriptor(0).unwrap().logical_type, crate::mapping::LogicalType::Int8);

        let mut cursor = table.execute(None).unwrap();
        let err = materialize(&schema, &mut *cursor, None).unwrap_err();
        assert!(err.is_out_of_range());
        match err {
            ConvertError::ConversionFailed { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "small");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_in_not_null_field() {
        let mut table = Table::new("t", vec![ColumnMetadata::new("id", SqlType::TinyInt).not_null()]);
        table.insert(vec![Value::Null]).unwrap();
        let schema = TypeMapper::default().map(&table.columns).unwrap();

        let mut cursor = table.execute(None).unwrap();
        let err = materialize(&schema, &mut *cursor, None).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ConversionFailed { row: 0, cause: ValueError::UnexpectedNull, .. }
        ));
    }

    #[test]
    fn test_empty_source_yields_empty_batch() {
        let mut table = Table::new("t", vec![ColumnMetadata::new("b", SqlType::TinyInt)]);
        let schema = TypeMapper::default().map(&table.columns).unwrap();
        let mut cursor = table.execute(None).unwrap();
        let batch = materialize(&schema, &mut *cursor, Some(10)).unwrap();

        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 1);
        assert_eq!(batch.column(0).as_primitive::<Int8Type>().len(), 0);
    }

    #[test]
    fn test_skipped_column_reads_right_source_position() {
        let mut table = Table::new(
            "t",
            vec![
                ColumnMetadata::new("a", SqlType::Integer),
                ColumnMetadata::new("blob", SqlType::Other),
                ColumnMetadata::new("c", SqlType::Integer),
            ],
        );
        table.insert(Row::new(vec![Value::Integer(1), Value::Text("?".into()), Value::Integer(3)])).unwrap();
        let mapper = TypeMapper::new(crate::config::UnsupportedTypePolicy::Skip, "UTC");
        let schema = mapper.map(&table.columns).unwrap();
        assert_eq!(schema.len(), 2);

        let mut cursor = table.execute(None).unwrap();
        let batch = materialize(&schema, &mut *cursor, None).unwrap();
        assert_eq!(batch.column(1).as_primitive::<Int32Type>().value(0), 3);
    }
}
