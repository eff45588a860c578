use crate::core::assets::AssetLoader;
use crate::core::cache::ResultCache;
use crate::core::document::DocumentExtractor;
use crate::core::router::{PageContent, PageRouter};
use crate::core::tabular::{DeclaredFormat, Origin, TabularSource};
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{Destination, MediaAsset, MediaKind, NavigationState, Record, Table};
use crate::utils::error::IngestError;
use crate::utils::validation;
use serde_json::json;
use std::fmt;

/// 使用者操作；每個 trigger 都會觸發一次完整的重新計算
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Render,
    UploadTable { bytes: Vec<u8>, format: DeclaredFormat },
    /// shell 讀不到上傳檔時改送這個，讓上傳區塊顯示錯誤
    UploadTableFailed(String),
    ClearTable,
    UploadDocument(Vec<u8>),
    UploadDocumentFailed(String),
    ClearDocument,
    Navigate(String),
    RefreshApi,
}

impl Trigger {
    /// 讀取要上傳的表格檔；讀不到檔案或分隔字元不合法時回傳失敗 trigger
    pub async fn upload_table_from_path(path: &str, delimiter: Option<&str>) -> Self {
        let format = match delimiter {
            Some(d) => match validation::validate_delimiter("delimiter", d) {
                Ok(byte) => DeclaredFormat::Delimited(byte),
                Err(e) => return Trigger::UploadTableFailed(e.to_string()),
            },
            None => DeclaredFormat::from_path(path).unwrap_or(DeclaredFormat::Csv),
        };

        match tokio::fs::read(path).await {
            Ok(bytes) => {
                tracing::info!("📂 Uploading table {} ({} bytes)", path, bytes.len());
                Trigger::UploadTable { bytes, format }
            }
            Err(e) => {
                tracing::warn!("⚠️ Cannot read table upload {}: {}", path, e);
                Trigger::UploadTableFailed(format!("{}: {}", path, e))
            }
        }
    }

    pub async fn upload_document_from_path(path: &str) -> Self {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                tracing::info!("📂 Uploading document {} ({} bytes)", path, bytes.len());
                Trigger::UploadDocument(bytes)
            }
            Err(e) => {
                tracing::warn!("⚠️ Cannot read document upload {}: {}", path, e);
                Trigger::UploadDocumentFailed(format!("{}: {}", path, e))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub uploaded_table: Option<Result<Origin, String>>,
    pub uploaded_document: Option<Result<Vec<u8>, String>>,
    pub navigation: NavigationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub value: &'static str,
    pub delta: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Table(Table),
    Metrics(Vec<Metric>),
    Media(Vec<MediaAsset>),
    Text(String),
    Page(PageContent),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub content: SectionContent,
    pub notices: Vec<Notice>,
}

impl Section {
    fn new(heading: impl Into<String>, content: SectionContent) -> Self {
        Self {
            heading: heading.into(),
            content,
            notices: Vec::new(),
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.content {
            SectionContent::Table(table) => Some(table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPage {
    pub sections: Vec<Section>,
}

impl RenderedPage {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.sections.iter().flat_map(|s| s.notices.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.notices().any(|n| n.level == NoticeLevel::Error)
    }
}

pub mod headings {
    pub const USERS: &str = "User Data Table";
    pub const API: &str = "Data from API";
    pub const UPLOAD: &str = "Upload CSV File";
    pub const RANDOM: &str = "Random DataFrame";
    pub const METRICS: &str = "Key Metrics";
    pub const LINE: &str = "Line Chart Data";
    pub const SALES: &str = "Sales and Profit";
    pub const MEDIA: &str = "Images, Video and Audio";
    pub const DOCUMENT: &str = "PDF Reader";
    pub const NAVIGATION: &str = "Navigation";
}

const RANDOM_COLUMNS: [&str; 5] = ["col_0", "col_1", "col_2", "col_3", "col_4"];
const LINE_COLUMNS: [&str; 3] = ["a", "b", "c"];

pub struct Dashboard<S: Storage, C: ConfigProvider> {
    config: C,
    source: TabularSource,
    cache: ResultCache<Table, IngestError>,
    extractor: DocumentExtractor,
    router: PageRouter,
    assets: AssetLoader<S>,
    state: DashboardState,
}

impl<S: Storage, C: ConfigProvider> Dashboard<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let state = DashboardState {
            navigation: NavigationState {
                selection: config.default_selection().to_string(),
            },
            ..DashboardState::default()
        };

        Self {
            config,
            source: TabularSource::new(),
            cache: ResultCache::new(),
            extractor: DocumentExtractor::new(),
            router: PageRouter::new(),
            assets: AssetLoader::new(storage),
            state,
        }
    }

    pub fn with_router(mut self, router: PageRouter) -> Self {
        self.router = router;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn cache(&self) -> &ResultCache<Table, IngestError> {
        &self.cache
    }

    pub fn api_origin(&self) -> Origin {
        Origin::remote(self.config.api_endpoint(), self.config.request_timeout())
    }

    pub async fn handle(&mut self, trigger: Trigger) -> RenderedPage {
        self.apply(trigger);
        self.render().await
    }

    pub fn apply(&mut self, trigger: Trigger) {
        tracing::debug!("Applying trigger {:?}", TriggerName(&trigger));
        match trigger {
            Trigger::Render => {}
            Trigger::UploadTable { bytes, format } => {
                self.state.uploaded_table = Some(Ok(Origin::uploaded(bytes, format)));
            }
            Trigger::UploadTableFailed(reason) => self.state.uploaded_table = Some(Err(reason)),
            Trigger::ClearTable => self.state.uploaded_table = None,
            Trigger::UploadDocument(bytes) => self.state.uploaded_document = Some(Ok(bytes)),
            Trigger::UploadDocumentFailed(reason) => self.state.uploaded_document = Some(Err(reason)),
            Trigger::ClearDocument => self.state.uploaded_document = None,
            Trigger::Navigate(selection) => self.state.navigation.selection = selection,
            Trigger::RefreshApi => match self.api_origin().cache_key() {
                Ok(key) => {
                    self.cache.invalidate(&key);
                }
                Err(e) => tracing::warn!("Could not derive API cache key: {}", e),
            },
        }
    }

    /// 由上到下重算整頁；每個區塊獨立降級，不會讓整頁失敗
    pub async fn render(&mut self) -> RenderedPage {
        tracing::info!("🖥️ Rendering dashboard");

        let mut sections = vec![self.users_section().await];
        sections.push(self.api_section().await);
        sections.push(self.upload_section().await);
        sections.push(self.generated_section(headings::RANDOM, 10, &RANDOM_COLUMNS).await);
        sections.push(metrics_section());
        sections.push(self.generated_section(headings::LINE, 100, &LINE_COLUMNS).await);
        sections.push(self.sales_section().await);
        sections.push(self.media_section().await);
        sections.push(self.document_section());
        sections.push(self.navigation_section());

        let page = RenderedPage { sections };
        let notice_count = page.notices().count();
        if notice_count > 0 {
            tracing::info!("✅ Dashboard rendered with {} notices", notice_count);
        } else {
            tracing::info!("✅ Dashboard rendered");
        }
        page
    }

    async fn users_section(&self) -> Section {
        let names = ["ahmad", "fairuz", "dabbir", "nura", "aco"];
        let ages = [20, 25, 30, 17, 35];
        let cities = ["Jakarta", "Bandung", "Surabaya", "Yogyakarta", "Malang"];
        let records = names
            .iter()
            .zip(ages)
            .zip(cities)
            .map(|((name, age), city)| {
                Record::from_pairs([("Name", json!(name)), ("Age", json!(age)), ("City", json!(city))])
            })
            .collect();

        self.literal_section(headings::USERS, records).await
    }

    async fn sales_section(&self) -> Section {
        let rows = [(2018, 100, 20), (2019, 120, 30), (2020, 90, 15), (2021, 140, 35), (2022, 180, 50)];
        let records = rows
            .iter()
            .map(|(year, sales, profit)| {
                Record::from_pairs([("Year", json!(year)), ("Sales", json!(sales)), ("Profit", json!(profit))])
            })
            .collect();

        self.literal_section(headings::SALES, records).await
    }

    async fn literal_section(&self, heading: &str, records: Vec<Record>) -> Section {
        self.uncached_section(heading, &Origin::Literal(records)).await
    }

    /// 每次重算都重新抽樣，不進快取
    async fn generated_section(&self, heading: &str, rows: usize, columns: &[&str]) -> Section {
        let origin = Origin::generated(rows, columns.iter().copied(), None);
        self.uncached_section(heading, &origin).await
    }

    async fn uncached_section(&self, heading: &str, origin: &Origin) -> Section {
        match self.source.fetch(origin).await {
            Ok(table) => Section::new(heading, SectionContent::Table(table)),
            Err(e) => Section::new(heading, SectionContent::Empty).with_notice(Notice::error(e.to_string())),
        }
    }

    async fn api_section(&mut self) -> Section {
        let origin = self.api_origin();
        let key = match origin.cache_key() {
            Ok(key) => key,
            Err(e) => {
                return Section::new(headings::API, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to fetch data from the API: {}", e)));
            }
        };

        let source = &self.source;
        let result = self
            .cache
            .get_or_compute_async(key, || source.fetch(&origin))
            .await;

        match result {
            Ok(table) if table.is_empty() => Section::new(headings::API, SectionContent::Empty),
            Ok(table) => Section::new(headings::API, SectionContent::Table(table)),
            Err(e) => {
                tracing::error!("❌ API fetch failed: {}", e);
                Section::new(headings::API, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to fetch data from the API: {}", e)))
            }
        }
    }

    async fn upload_section(&self) -> Section {
        let origin = match &self.state.uploaded_table {
            None => {
                return Section::new(headings::UPLOAD, SectionContent::Empty)
                    .with_notice(Notice::info("Please upload a file to view its data."));
            }
            Some(Err(reason)) => {
                return Section::new(headings::UPLOAD, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to read CSV file: {}", reason)));
            }
            Some(Ok(origin)) => origin,
        };

        match self.source.fetch(origin).await {
            Ok(table) => Section::new(headings::UPLOAD, SectionContent::Table(table)),
            Err(e) => {
                tracing::warn!("⚠️ Uploaded table rejected: {}", e);
                Section::new(headings::UPLOAD, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to read CSV file: {}", e)))
            }
        }
    }

    async fn media_section(&self) -> Section {
        let mut assets = Vec::new();
        let mut notices = Vec::new();
        let timeout = self.config.request_timeout();

        if let Some(path) = self.config.image_path() {
            match self.assets.load_local(MediaKind::Image, path).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    notices.push(Notice::warning(format!("Local image not found: {}", path)));
                }
            }
        }

        if let Some(url) = self.config.remote_image_url() {
            match self.assets.fetch_remote_image(url, timeout).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::error!("❌ Remote image failed: {}", e);
                    notices.push(Notice::error(format!("Failed to load image from URL: {}", e)));
                }
            }
        }

        for (kind, path) in [
            (MediaKind::Video, self.config.video_path()),
            (MediaKind::Audio, self.config.audio_path()),
        ] {
            let Some(path) = path else { continue };
            match self.assets.load_local(kind, path).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    notices.push(Notice::warning(format!(
                        "File {} not found or cannot be played.",
                        path
                    )));
                }
            }
        }

        Section {
            heading: headings::MEDIA.to_string(),
            content: SectionContent::Media(assets),
            notices,
        }
    }

    fn document_section(&self) -> Section {
        let bytes = match &self.state.uploaded_document {
            None => return Section::new(headings::DOCUMENT, SectionContent::Empty),
            Some(Err(reason)) => {
                return Section::new(headings::DOCUMENT, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to read PDF: {}", reason)));
            }
            Some(Ok(bytes)) => bytes,
        };

        match self.extractor.extract_text(bytes) {
            Ok(document) => {
                tracing::debug!("Document has {} pages", document.page_count());
                Section::new(headings::DOCUMENT, SectionContent::Text(document.text()))
            }
            Err(e) => {
                tracing::warn!("⚠️ Document rejected: {}", e);
                Section::new(headings::DOCUMENT, SectionContent::Empty)
                    .with_notice(Notice::error(format!("Failed to read PDF: {}", e)))
            }
        }
    }

    fn navigation_section(&self) -> Section {
        let selection = &self.state.navigation.selection;
        let page = self.router.render(&self.state.navigation);
        let section = Section::new(headings::NAVIGATION, SectionContent::Page(page));

        // 比對不到的選項沿用最後一頁，但要讓使用者看得到
        if Destination::from_label(selection).is_none() {
            return section.with_notice(Notice::warning(format!(
                "Unknown page '{}', showing {}",
                selection,
                PageRouter::FALLBACK.label()
            )));
        }
        section
    }
}

fn metrics_section() -> Section {
    let metrics = vec![
        Metric {
            label: "Revenue",
            value: "Rp 200 Juta",
            delta: "+5%",
        },
        Metric {
            label: "Active Users",
            value: "1.250",
            delta: "+2%",
        },
        Metric {
            label: "Refunds",
            value: "15",
            delta: "-1%",
        },
    ];
    Section::new(headings::METRICS, SectionContent::Metrics(metrics))
}

/// 記錄 trigger 時不要把上傳的位元組整段印出來
struct TriggerName<'a>(&'a Trigger);

impl fmt::Debug for TriggerName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Trigger::Render => f.write_str("Render"),
            Trigger::UploadTable { bytes, format } => {
                write!(f, "UploadTable({} bytes, {:?})", bytes.len(), format)
            }
            Trigger::UploadTableFailed(reason) => write!(f, "UploadTableFailed({:?})", reason),
            Trigger::ClearTable => f.write_str("ClearTable"),
            Trigger::UploadDocument(bytes) => write!(f, "UploadDocument({} bytes)", bytes.len()),
            Trigger::UploadDocumentFailed(reason) => write!(f, "UploadDocumentFailed({:?})", reason),
            Trigger::ClearDocument => f.write_str("ClearDocument"),
            Trigger::Navigate(selection) => write!(f, "Navigate({:?})", selection),
            Trigger::RefreshApi => f.write_str("RefreshApi"),
        }
    }
}

impl fmt::Display for RenderedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "### {}", section.heading)?;
            match &section.content {
                SectionContent::Table(table) => write!(f, "{}", table)?,
                SectionContent::Metrics(metrics) => {
                    for m in metrics {
                        writeln!(f, "{}: {} ({})", m.label, m.value, m.delta)?;
                    }
                }
                SectionContent::Media(assets) => {
                    for a in assets {
                        writeln!(
                            f,
                            "- {:?} {} ({}, {} bytes)",
                            a.kind,
                            a.source,
                            a.mime_type,
                            a.bytes.len()
                        )?;
                    }
                }
                SectionContent::Text(text) => writeln!(f, "{}", text)?,
                SectionContent::Page(page) => writeln!(f, "## {}\n{}", page.title, page.body)?,
                SectionContent::Empty => {}
            }
            for notice in &section.notices {
                let tag = match notice.level {
                    NoticeLevel::Info => "info",
                    NoticeLevel::Warning => "warning",
                    NoticeLevel::Error => "error",
                };
                writeln!(f, "[{}] {}", tag, notice.message)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
