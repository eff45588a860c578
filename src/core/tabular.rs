use crate::core::cache::CacheKey;
use crate::domain::model::{Column, Record, Table, Value};
use crate::utils::error::IngestError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// 上傳檔宣告的分隔格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclaredFormat {
    Csv,
    Tsv,
    Delimited(u8),
}

impl DeclaredFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            DeclaredFormat::Csv => b',',
            DeclaredFormat::Tsv => b'\t',
            DeclaredFormat::Delimited(d) => *d,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(DeclaredFormat::Csv),
            "tsv" | "tab" => Some(DeclaredFormat::Tsv),
            _ => None,
        }
    }
}

/// 資料表的來源
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Origin {
    Literal(Vec<Record>),
    RemoteEndpoint { url: String, timeout: Duration },
    UploadedBlob { bytes: Vec<u8>, format: DeclaredFormat },
    /// 標準常態分布的亂數表；指定 seed 時內容可重現
    Generated {
        rows: usize,
        columns: Vec<String>,
        seed: Option<u64>,
    },
}

impl Origin {
    pub fn remote(url: impl Into<String>, timeout: Duration) -> Self {
        Origin::RemoteEndpoint {
            url: url.into(),
            timeout,
        }
    }

    pub fn uploaded(bytes: impl Into<Vec<u8>>, format: DeclaredFormat) -> Self {
        Origin::UploadedBlob {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn generated<I, N>(rows: usize, columns: I, seed: Option<u64>) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Origin::Generated {
            rows,
            columns: columns.into_iter().map(Into::into).collect(),
            seed,
        }
    }

    /// 相同參數的來源一定得到相同的 key
    pub fn cache_key(&self) -> serde_json::Result<CacheKey> {
        CacheKey::new(TabularSource::OPERATION, self)
    }

    fn describe(&self) -> String {
        match self {
            Origin::Literal(records) => format!("literal ({} records)", records.len()),
            Origin::RemoteEndpoint { url, .. } => format!("remote {}", url),
            Origin::UploadedBlob { bytes, .. } => format!("upload ({} bytes)", bytes.len()),
            Origin::Generated { rows, columns, .. } => {
                format!("generated ({} rows x {} columns)", rows, columns.len())
            }
        }
    }
}

pub struct TabularSource {
    client: Client,
}

impl TabularSource {
    pub const OPERATION: &'static str = "tabular_source.fetch";

    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, origin: &Origin) -> Result<Table, IngestError> {
        tracing::debug!("Fetching table from {}", origin.describe());

        let table = match origin {
            Origin::Literal(records) => Table::from_records(records),
            Origin::RemoteEndpoint { url, timeout } => self.fetch_remote(url, *timeout).await?,
            Origin::UploadedBlob { bytes, format } => parse_delimited(bytes, *format)?,
            Origin::Generated { rows, columns, seed } => generate_table(*rows, columns, *seed)?,
        };

        tracing::debug!(
            "Table ready: {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    async fn fetch_remote(&self, url: &str, timeout: Duration) -> Result<Table, IngestError> {
        tracing::debug!("Making API request to: {} (timeout {:?})", url, timeout);
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(IngestError::network(
                Some(status.as_u16()),
                format!("{} answered with status {}", url, status),
            ));
        }

        let body = response.bytes().await?;
        let json_data: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| IngestError::parse(format!("invalid JSON from {}: {}", url, e)))?;

        let records = records_from_json(json_data)?;
        tracing::info!("📥 Received {} records from {}", records.len(), url);
        Ok(Table::from_records(&records))
    }
}

impl Default for TabularSource {
    fn default() -> Self {
        Self::new()
    }
}

/// API 回傳應為物件陣列；單一物件視為一筆記錄
pub fn records_from_json(json_data: serde_json::Value) -> Result<Vec<Record>, IngestError> {
    match json_data {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(data) => Ok(Record { data }),
                other => Err(IngestError::parse(format!(
                    "element {} is not a record object: {}",
                    index, other
                ))),
            })
            .collect(),
        serde_json::Value::Object(data) => Ok(vec![Record { data }]),
        other => Err(IngestError::parse(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// 解析分隔文字；欄數不一致的列直接回傳錯誤，不產生部分結果
pub fn parse_delimited(bytes: &[u8], format: DeclaredFormat) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestError::parse("no columns to parse from upload"));
    }
    let names = unique_headers(&headers);

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for result in reader.records() {
        let record = result?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::from_cells(name, &raw))
        .collect();
    Table::new(columns)
}

/// 逐欄抽樣，每格為 N(0, 1) 的浮點數
pub fn generate_table(rows: usize, columns: &[String], seed: Option<u64>) -> Result<Table, IngestError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let columns = columns
        .iter()
        .map(|name| {
            let values = (0..rows)
                .map(|_| Value::Float(rng.sample(StandardNormal)))
                .collect();
            Column::new(name.clone(), values)
        })
        .collect();
    Table::new(columns)
}

fn unique_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let mut candidate = header.to_string();
        let mut suffix = 0;
        while names.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}.{}", header, suffix);
        }
        names.push(candidate);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ColumnType;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_rectangular_csv() {
        let csv = b"Nama,Usia,Kota\nahmad,20,Jakarta\nfairuz,25,Bandung\n";
        let table = parse_delimited(csv, DeclaredFormat::Csv).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.column_names(), vec!["Nama", "Usia", "Kota"]);
        assert_eq!(table.column("Usia").unwrap().column_type(), ColumnType::Integer);
        assert_eq!(
            table.row(1).unwrap(),
            vec![
                &Value::Text("fairuz".to_string()),
                &Value::Integer(25),
                &Value::Text("Bandung".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_ragged_rows_is_error() {
        let csv = b"a,b,c\n1,2,3\n4,5\n";
        let result = parse_delimited(csv, DeclaredFormat::Csv);
        assert!(matches!(result, Err(IngestError::ParseError { .. })));

        let too_long = b"a,b\n1,2,3\n";
        assert!(parse_delimited(too_long, DeclaredFormat::Csv).is_err());
    }

    #[test]
    fn test_parse_empty_upload_is_error() {
        assert!(matches!(
            parse_delimited(b"", DeclaredFormat::Csv),
            Err(IngestError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_utf8_is_error() {
        let bytes = b"name\n\xff\xfe\n";
        assert!(parse_delimited(bytes, DeclaredFormat::Csv).is_err());
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_delimited(b"x,y\n", DeclaredFormat::Csv).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_tsv_and_custom_delimiter() {
        let tsv = b"Tahun\tLaba\n2018\t20\n2019\t30.5\n";
        let table = parse_delimited(tsv, DeclaredFormat::Tsv).unwrap();
        assert_eq!(table.column("Laba").unwrap().column_type(), ColumnType::Float);
        assert_eq!(table.column("Laba").unwrap().values()[0], Value::Float(20.0));

        let semi = b"a;b\n1;\n";
        let table = parse_delimited(semi, DeclaredFormat::Delimited(b';')).unwrap();
        assert_eq!(table.column("b").unwrap().values()[0], Value::Null);
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let table = parse_delimited(b"a,a,a\n1,2,3\n", DeclaredFormat::Csv).unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "a.2"]);
    }

    #[test]
    fn test_generate_table_shape() {
        let columns: Vec<String> = (0..5).map(|i| format!("col_{}", i)).collect();
        let table = generate_table(10, &columns, Some(7)).unwrap();

        assert_eq!(table.row_count(), 10);
        assert_eq!(table.column_names(), vec!["col_0", "col_1", "col_2", "col_3", "col_4"]);
        assert!(table
            .columns()
            .iter()
            .all(|c| c.column_type() == ColumnType::Float));
        assert!(table.rows().flatten().all(|v| v.as_f64().is_some_and(f64::is_finite)));
    }

    #[test]
    fn test_generate_table_seed_is_reproducible() {
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let first = generate_table(100, &columns, Some(42)).unwrap();
        let second = generate_table(100, &columns, Some(42)).unwrap();
        let other = generate_table(100, &columns, Some(43)).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_fetch_generated() {
        let origin = Origin::generated(3, ["a", "b"], None);
        let table = TabularSource::new().fetch(&origin).await.unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_declared_format_from_path() {
        assert_eq!(DeclaredFormat::from_path("users.CSV"), Some(DeclaredFormat::Csv));
        assert_eq!(DeclaredFormat::from_path("sales.tsv"), Some(DeclaredFormat::Tsv));
        assert_eq!(DeclaredFormat::from_path("notes.txt"), None);
        assert_eq!(DeclaredFormat::from_path("README"), None);
    }

    #[test]
    fn test_records_from_json_rejects_scalars() {
        assert!(records_from_json(json!([1, 2])).is_err());
        assert!(records_from_json(json!("nope")).is_err());
        assert_eq!(records_from_json(json!({"id": 1})).unwrap().len(), 1);
    }

    #[test]
    fn test_cache_key_is_stable_per_origin() {
        let a = Origin::remote("https://example.org/users", Duration::from_secs(10));
        let b = Origin::remote("https://example.org/users", Duration::from_secs(10));
        let c = Origin::remote("https://example.org/users", Duration::from_secs(5));

        assert_eq!(a.cache_key().unwrap(), b.cache_key().unwrap());
        assert_ne!(a.cache_key().unwrap(), c.cache_key().unwrap());
    }

    #[tokio::test]
    async fn test_fetch_literal() {
        let origin = Origin::Literal(vec![
            Record::from_pairs([("Nama", json!("ahmad")), ("Usia", json!(20))]),
            Record::from_pairs([("Nama", json!("nura")), ("Usia", json!(17))]),
        ]);
        let table = TabularSource::new().fetch(&origin).await.unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("Usia").unwrap().values()[1], Value::Integer(17));
    }

    #[tokio::test]
    async fn test_fetch_remote_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"id": 1, "name": "Leanne Graham"},
                    {"id": 2, "name": "Ervin Howell", "phone": "010-692-6593"}
                ]));
        });

        let origin = Origin::remote(server.url("/users"), Duration::from_secs(10));
        let table = TabularSource::new().fetch(&origin).await.unwrap();

        api_mock.assert();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["id", "name", "phone"]);
        assert!(table.column("phone").unwrap().values()[0].is_null());
    }

    #[tokio::test]
    async fn test_fetch_remote_server_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(500);
        });

        let origin = Origin::remote(server.url("/users"), Duration::from_secs(10));
        let err = TabularSource::new().fetch(&origin).await.unwrap_err();

        api_mock.assert();
        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, IngestError::NetworkError { .. }));
    }

    #[tokio::test]
    async fn test_fetch_remote_invalid_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body("<html>not json</html>");
        });

        let origin = Origin::remote(server.url("/users"), Duration::from_secs(10));
        let err = TabularSource::new().fetch(&origin).await.unwrap_err();
        assert!(matches!(err, IngestError::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_fetch_remote_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!([]));
        });

        let origin = Origin::remote(server.url("/slow"), Duration::from_millis(50));
        let err = TabularSource::new().fetch(&origin).await.unwrap_err();

        assert!(matches!(err, IngestError::NetworkError { status: None, .. }));
    }
}
