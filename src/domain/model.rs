use crate::utils::error::IngestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始資料列 (API 回傳或常數資料)，保留欄位出現順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, serde_json::Value)>,
    {
        let data = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// 解析分隔文字中的單一欄位：空字串視為缺值
    pub fn parse_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        // "inf"、"nan" 之類的字樣保留為文字
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }

    /// 文字欄位保留原始字串，只有空字串轉成缺值
    fn raw_cell(raw: &str) -> Self {
        if raw.is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    fn coerce(self, column_type: ColumnType) -> Self {
        match (column_type, self) {
            (ColumnType::Float, Value::Integer(i)) => Value::Float(i as f64),
            (ColumnType::Text, Value::Integer(i)) => Value::Text(i.to_string()),
            (ColumnType::Text, Value::Float(f)) => Value::Text(f.to_string()),
            (_, v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    fn infer(values: &[Value]) -> Self {
        let mut saw_integer = false;
        let mut saw_float = false;
        for value in values {
            match value {
                Value::Null => {}
                Value::Integer(_) => saw_integer = true,
                Value::Float(_) => saw_float = true,
                Value::Text(_) => return ColumnType::Text,
            }
        }
        match (saw_integer, saw_float) {
            (_, true) => ColumnType::Float,
            (true, false) => ColumnType::Integer,
            (false, false) => ColumnType::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// 推斷欄位型別並把所有值轉成同一型別
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let column_type = ColumnType::infer(&values);
        let values = values.into_iter().map(|v| v.coerce(column_type)).collect();
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    /// 由分隔文字的原始欄位建立欄；先依原始字串決定型別再轉換，
    /// 文字欄逐格保留輸入內容 ("007" 不會變成 "7")
    pub fn from_cells<S: AsRef<str>>(name: impl Into<String>, cells: &[S]) -> Self {
        let parsed: Vec<Value> = cells.iter().map(|c| Value::parse_cell(c.as_ref())).collect();
        let column_type = ColumnType::infer(&parsed);
        let values = match column_type {
            ColumnType::Text => cells.iter().map(|c| Value::raw_cell(c.as_ref())).collect(),
            _ => parsed.into_iter().map(|v| v.coerce(column_type)).collect(),
        };
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 不可變的矩形資料表；所有欄位長度一致
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, IngestError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(IngestError::parse(format!(
                    "column '{}' has {} values, expected {}",
                    bad.name(),
                    bad.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    /// 欄位取所有記錄鍵的聯集 (依首次出現順序)，缺少的欄位填 Null
    pub fn from_records(records: &[Record]) -> Self {
        let mut names: Vec<&str> = Vec::new();
        for record in records {
            for key in record.data.keys() {
                if !names.contains(&key.as_str()) {
                    names.push(key);
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let values = records
                    .iter()
                    .map(|r| r.data.get(name).map(Value::from_json).unwrap_or(Value::Null))
                    .collect();
                Column::new(name, values)
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(empty table)");
        }

        let cells: Vec<Vec<String>> = self
            .rows()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(c.name().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_row(f, &self.column_names(), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "|-{}-|", rule.join("-|-"))?;
        for row in &cells {
            let row: Vec<&str> = row.iter().map(String::as_str).collect();
            write_row(f, &row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[&str], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "| {} |", line.join(" | "))
}

/// 依頁序排列的文件文字；失敗的頁面以空字串佔位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn text(&self) -> String {
        self.pages.concat()
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Home,
    About,
    Contact,
}

impl Destination {
    pub const ALL: [Destination; 3] = [Destination::Home, Destination::About, Destination::Contact];

    pub fn label(&self) -> &'static str {
        match self {
            Destination::Home => "Home",
            Destination::About => "About",
            Destination::Contact => "Contact",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Destination::label).collect()
    }

    /// 完全比對標籤；比對不到時回傳 None，由 router 決定 fallback
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// 導覽狀態由 shell 持有，router 只讀取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub selection: String,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            selection: Destination::Home.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub kind: MediaKind,
    pub source: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaAsset {
    pub fn guess_mime_type(source: &str) -> &'static str {
        let extension = source
            .rsplit('.')
            .next()
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "webp" => "image/webp",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "ogg" => "audio/ogg",
            _ => "application/octet-stream",
        }
    }
}
