// Paginated fetch against the in-memory table source
use arrow::array::AsArray;
use arrow::datatypes::Int32Type;
use arrow::record_batch::RecordBatch;
use postgrust_arrow::{ColumnMetadata, FetchState, PageSize, SqlType, Table, Value, convert_all, open_paginated};

fn orders(rows: i32) -> Table {
    let mut table = Table::new(
        "orders",
        vec![
            ColumnMetadata::new("id", SqlType::Integer).not_null(),
            ColumnMetadata::new("note", SqlType::Varchar),
        ],
    );
    for id in 0..rows {
        let note = if id % 3 == 0 { Value::Null } else { Value::Text(format!("order {id}")) };
        table.insert(vec![Value::Integer(id), note]).unwrap();
    }
    table
}

fn ids(batch: &RecordBatch) -> Vec<i32> {
    batch.column(0).as_primitive::<Int32Type>().values().to_vec()
}

#[test]
fn test_ten_rows_page_of_three() {
    let mut table = orders(10);
    let mut fetch = open_paginated(&mut table, 3).unwrap();

    let mut windows = Vec::new();
    for _ in 0..4 {
        windows.push(ids(&fetch.fetch_next().unwrap()));
    }
    assert_eq!(
        windows,
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]
    );
    assert_eq!(fetch.state(), FetchState::Done);

    let fifth = fetch.fetch_next().unwrap();
    assert_eq!(fifth.num_rows(), 0);
    assert_eq!(fetch.state(), FetchState::Done);
}

#[test]
fn test_done_is_idempotent_and_quiet() {
    let mut table = orders(4);
    {
        let mut fetch = open_paginated(&mut table, 3).unwrap();
        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 3);
        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 1);
        for _ in 0..5 {
            let batch = fetch.fetch_next().unwrap();
            assert_eq!(batch.num_rows(), 0);
            assert_eq!(batch.num_columns(), 2);
        }
    }
    assert_eq!(table.executions(), 2);
}

#[test]
fn test_exact_multiple_ends_with_empty_probe() {
    let mut table = orders(9);
    let mut fetch = open_paginated(&mut table, 3).unwrap();

    let sizes: Vec<usize> = (0..4).map(|_| fetch.fetch_next().unwrap().num_rows()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 0]);
    assert!(fetch.is_done());
}

#[test]
fn test_pages_cover_every_row_once() {
    let mut table = orders(23);
    let mut fetch = open_paginated(&mut table, 5).unwrap();

    let all: Vec<i32> = fetch.pages().flat_map(|batch| ids(&batch.unwrap())).collect();
    assert_eq!(all, (0..23).collect::<Vec<_>>());
}

#[test]
fn test_unbounded_matches_single_shot() {
    let mut table = orders(12);
    let single = convert_all(&mut table).unwrap();

    let mut fetch = open_paginated(&mut table, -1).unwrap();
    assert_eq!(fetch.page_size(), PageSize::Unbounded);
    let paged = fetch.fetch_next().unwrap();
    assert!(fetch.is_done());

    assert_eq!(single, paged);
}

#[test]
fn test_empty_source() {
    let mut table = orders(0);
    let mut fetch = open_paginated(&mut table, 4).unwrap();

    let batch = fetch.fetch_next().unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 2);
    assert!(fetch.is_done());
}

#[test]
fn test_invalid_page_sizes() {
    let mut table = orders(1);
    for limit in [0, -2, i64::MIN] {
        assert!(open_paginated(&mut table, limit).is_err(), "page size {limit}");
    }
}
