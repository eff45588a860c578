use small_dash::{DeclaredFormat, IngestError, Origin, TabularSource, Value};

fn grid_csv(rows: usize, cols: usize) -> String {
    let header: Vec<String> = (0..cols).map(|c| format!("col_{}", c)).collect();
    let mut lines = vec![header.join(",")];
    for r in 0..rows {
        let row: Vec<String> = (0..cols).map(|c| format!("r{}c{}", r, c)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

#[tokio::test]
async fn test_rectangular_upload_keeps_shape_and_positions() {
    let source = TabularSource::new();

    for (rows, cols) in [(0, 1), (1, 1), (7, 4), (25, 3)] {
        let origin = Origin::uploaded(grid_csv(rows, cols), DeclaredFormat::Csv);
        let table = source.fetch(&origin).await.unwrap();

        assert_eq!(table.row_count(), rows);
        assert_eq!(table.column_count(), cols);
        for (r, row) in table.rows().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert_eq!(**value, Value::Text(format!("r{}c{}", r, c)));
            }
        }
    }
}

#[tokio::test]
async fn test_ragged_upload_never_returns_partial_table() {
    let source = TabularSource::new();
    let mut csv = grid_csv(5, 3);
    csv.push_str("\nonly,two");

    let origin = Origin::uploaded(csv, DeclaredFormat::Csv);
    let result = source.fetch(&origin).await;

    assert!(matches!(result, Err(IngestError::ParseError { .. })));
}

#[tokio::test]
async fn test_quoted_fields_with_delimiters() {
    let csv = "Nama,Kota\n\"aco, jr\",\"Malang\"\n";
    let table = TabularSource::new()
        .fetch(&Origin::uploaded(csv, DeclaredFormat::Csv))
        .await
        .unwrap();

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.column("Nama").unwrap().values()[0], Value::Text("aco, jr".to_string()));
}

#[tokio::test]
async fn test_mixed_column_keeps_exact_input_text() {
    let csv = "code,note\n007,a\nabc,b\n1.0,c\n1e3,d\n";
    let table = TabularSource::new()
        .fetch(&Origin::uploaded(csv, DeclaredFormat::Csv))
        .await
        .unwrap();

    let code: Vec<String> = table
        .column("code")
        .unwrap()
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(code, vec!["007", "abc", "1.0", "1e3"]);
    assert_eq!(table.column("code").unwrap().values()[0], Value::Text("007".to_string()));
}
