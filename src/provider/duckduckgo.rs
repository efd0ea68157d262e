//! DuckDuckGo provider implementation
//!
//! Text results come from the lite HTML endpoint, answers from the instant
//! answer API, images and videos from the `i.js` / `v.js` JSON endpoints.
//! Every operation pages lazily: the next page is requested only once the
//! consumer has pulled every item of the previous one.

use super::error::ProviderError;
use super::options::{ImageOptions, SafeSearch, TextOptions, VideoOptions};
use super::traits::{ProviderSession, RecordStream, ResultRecord, SearchProvider};
use crate::network::{HttpClient, OutgoingRequest, OutgoingResponse};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Public site, used to make relative icon paths absolute
const DUCKDUCKGO_URL: &str = "https://duckduckgo.com";

/// Page limit for the lite endpoint
const MAX_TEXT_PAGES: usize = 11;

/// Page limit for the JSON endpoints
const MAX_JSON_PAGES: usize = 10;

static VQD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"vqd=(?:"([^"]+)"|'([^']+)'|([^&"'\s]+)&)"#).expect("valid vqd regex")
});

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result-link").expect("valid selector"));
static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.result-snippet").expect("valid selector"));
static FORM: Lazy<Selector> = Lazy::new(|| Selector::parse("form").expect("valid selector"));
static INPUT: Lazy<Selector> = Lazy::new(|| Selector::parse("input").expect("valid selector"));

/// Base URLs of the DuckDuckGo endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Site root, serves vqd tokens and the JSON endpoints
    pub site: String,
    /// Lite HTML search
    pub lite: String,
    /// Instant answer API
    pub api: String,
}

impl Endpoints {
    /// Point every endpoint below one base URL
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            site: base.to_string(),
            lite: format!("{}/lite/", base),
            api: format!("{}/api/", base),
        }
    }

    fn images(&self) -> String {
        format!("{}/i.js", self.site)
    }

    fn videos(&self) -> String {
        format!("{}/v.js", self.site)
    }

    fn referer(&self) -> String {
        format!("{}/", self.site)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            site: DUCKDUCKGO_URL.to_string(),
            lite: "https://lite.duckduckgo.com/lite/".to_string(),
            api: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

/// DuckDuckGo search provider
pub struct DuckDuckGo {
    client: HttpClient,
    endpoints: Arc<Endpoints>,
}

impl DuckDuckGo {
    pub fn new(client: HttpClient) -> Self {
        Self::with_endpoints(client, Endpoints::default())
    }

    pub fn with_endpoints(client: HttpClient, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints: Arc::new(endpoints),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn open(&self) -> Result<Box<dyn ProviderSession>, ProviderError> {
        let mut client = self.client.clone();
        client.rotate_user_agent();
        debug!(user_agent = client.user_agent(), "duckduckgo session opened");

        Ok(Box::new(DuckDuckGoSession {
            client,
            endpoints: self.endpoints.clone(),
            vqd_cache: Mutex::new(HashMap::new()),
        }))
    }
}

/// One request's worth of DuckDuckGo state
pub struct DuckDuckGoSession {
    client: HttpClient,
    endpoints: Arc<Endpoints>,
    vqd_cache: Mutex<HashMap<String, String>>,
}

impl Drop for DuckDuckGoSession {
    fn drop(&mut self) {
        debug!("duckduckgo session closed");
    }
}

impl DuckDuckGoSession {
    async fn send(&self, request: OutgoingRequest) -> Result<OutgoingResponse, ProviderError> {
        let response = self.client.execute(request).await?;

        if response.is_rate_limited() {
            return Err(ProviderError::RateLimited);
        }
        if !response.is_success() {
            return Err(ProviderError::Http(response.status));
        }

        Ok(response)
    }

    async fn get_json(
        &self,
        url: String,
        params: Vec<(String, String)>,
    ) -> Result<Value, ProviderError> {
        let request = OutgoingRequest::get(url)
            .accept_json()
            .header("Referer", self.endpoints.referer())
            .params(params);

        let response = self.send(request).await?;
        Ok(response.json()?)
    }

    /// Per-query token required by the JSON endpoints
    async fn vqd(&self, keywords: &str) -> Result<String, ProviderError> {
        let cached = self.cache().get(keywords).cloned();
        if let Some(vqd) = cached {
            return Ok(vqd);
        }

        let request = OutgoingRequest::post(&self.endpoints.site)
            .header("Referer", self.endpoints.referer())
            .form(vec![pair("q", keywords)]);
        let response = self.send(request).await?;

        let vqd = extract_vqd(&response.text)
            .ok_or_else(|| ProviderError::Token(keywords.to_string()))?;
        self.cache().insert(keywords.to_string(), vqd.clone());

        Ok(vqd)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.vqd_cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn lite_page(
        &self,
        keywords: &str,
        mut cursor: LiteCursor,
    ) -> Result<(Vec<ResultRecord>, Option<LiteCursor>), ProviderError> {
        let request = OutgoingRequest::post(&self.endpoints.lite)
            .header("Referer", self.endpoints.referer())
            .form(cursor.form.clone());
        let response = self.send(request).await?;

        let page = parse_lite_page(&response.text);
        cursor.page += 1;

        let google_fallback = format!("http://www.google.com/search?q={}", keywords);
        let records: Vec<ResultRecord> = page
            .results
            .into_iter()
            .filter(|r| r.href != google_fallback && cursor.seen.insert(r.href.clone()))
            .map(LiteResult::into_record)
            .collect();

        debug!(page = cursor.page, count = records.len(), "duckduckgo lite page");

        let next = match page.next {
            Some(next) if cursor.page < MAX_TEXT_PAGES => {
                cursor.set("s", next.offset);
                if let Some(vqd) = next.vqd.or_else(|| extract_vqd(&response.text)) {
                    cursor.set("vqd", vqd);
                }
                Some(cursor)
            }
            _ => None,
        };

        Ok((records, next))
    }

    async fn answer_page(
        &self,
        keywords: &str,
        stage: AnswerStage,
    ) -> Result<(Vec<ResultRecord>, Option<AnswerStage>), ProviderError> {
        match stage {
            AnswerStage::Abstract => {
                let params = vec![
                    pair("q", &format!("what is {}", keywords)),
                    pair("format", "json"),
                ];
                let data = self.get_json(self.endpoints.api.clone(), params).await?;
                Ok((abstract_records(&data), Some(AnswerStage::Related)))
            }
            AnswerStage::Related => {
                let params = vec![pair("q", keywords), pair("format", "json")];
                let data = self.get_json(self.endpoints.api.clone(), params).await?;
                Ok((related_records(&data), None))
            }
        }
    }

    async fn json_page(
        &self,
        keywords: &str,
        url: String,
        mut cursor: JsonCursor,
        map_row: RowMapper,
    ) -> Result<(Vec<ResultRecord>, Option<JsonCursor>), ProviderError> {
        if !cursor.has("vqd") {
            let vqd = self.vqd(keywords).await?;
            cursor.set("vqd", vqd);
        }

        let data = self.get_json(url, cursor.params.clone()).await?;
        cursor.page += 1;

        let rows = match data.get("results").and_then(Value::as_array) {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Ok((Vec::new(), None)),
        };

        let mut records = Vec::new();
        for row in rows {
            if let Some((key, record)) = map_row(row) {
                if cursor.seen.insert(key) {
                    records.push(record);
                }
            }
        }

        debug!(page = cursor.page, count = records.len(), "duckduckgo json page");

        let next = cursor.advance(&data);
        Ok((records, next))
    }
}

impl ProviderSession for DuckDuckGoSession {
    fn text<'a>(&'a self, keywords: &'a str, options: &'a TextOptions) -> RecordStream<'a> {
        let mut form = vec![
            pair("q", keywords),
            pair("kl", &options.region),
            pair("kp", kp_code(options.safesearch)),
        ];
        if let Some(limit) = options.timelimit {
            form.push(pair("df", limit.code()));
        }

        paginate(LiteCursor::new(form), move |cursor| {
            self.lite_page(keywords, cursor)
        })
    }

    fn answers<'a>(&'a self, keywords: &'a str) -> RecordStream<'a> {
        paginate(AnswerStage::Abstract, move |stage| {
            self.answer_page(keywords, stage)
        })
    }

    fn images<'a>(&'a self, keywords: &'a str, options: &'a ImageOptions) -> RecordStream<'a> {
        let filters = [
            prefixed("time", options.timelimit.map(|t| t.image_code())),
            prefixed("size", options.size.as_deref()),
            prefixed("color", options.color.as_deref()),
            prefixed("type", options.type_image.as_deref()),
            prefixed("layout", options.layout.as_deref()),
            prefixed("license", options.license.as_deref()),
        ];
        let params = vec![
            pair("l", &options.region),
            pair("o", "json"),
            pair("q", keywords),
            pair("f", &filters.join(",")),
            pair("p", image_safesearch_code(options.safesearch)),
        ];

        paginate(JsonCursor::new(params), move |cursor| {
            self.json_page(keywords, self.endpoints.images(), cursor, image_row)
        })
    }

    fn videos<'a>(&'a self, keywords: &'a str, options: &'a VideoOptions) -> RecordStream<'a> {
        let resolution = options.resolution.map(|r| r.to_string());
        let filters = [
            prefixed("publishedAfter", options.timelimit.and_then(|t| t.video_code())),
            prefixed("videoDefinition", resolution.as_deref()),
            prefixed("videoDuration", options.duration.as_deref()),
            prefixed("videoLicense", options.license.as_deref()),
        ];
        let params = vec![
            pair("l", &options.region),
            pair("o", "json"),
            pair("s", "0"),
            pair("q", keywords),
            pair("f", &filters.join(",")),
            pair("p", kp_code(options.safesearch)),
        ];

        paginate(JsonCursor::new(params), move |cursor| {
            self.json_page(keywords, self.endpoints.videos(), cursor, video_row)
        })
    }
}

/// Turn a page fetcher into a flat, lazy record stream.
///
/// `fetch` receives the cursor for the next page and returns that page's
/// records plus the cursor after it, or `None` once there are no more pages.
fn paginate<'a, C, F, Fut>(start: C, mut fetch: F) -> RecordStream<'a>
where
    C: Send + 'a,
    F: FnMut(C) -> Fut + Send + 'a,
    Fut: Future<Output = Result<(Vec<ResultRecord>, Option<C>), ProviderError>> + Send + 'a,
{
    stream::try_unfold(Some(start), move |cursor| {
        let page = cursor.map(&mut fetch);
        async move {
            match page {
                Some(page) => page.await.map(Some),
                None => Ok(None),
            }
        }
    })
    .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, ProviderError>)))
    .try_flatten()
    .boxed()
}

/// Paging state of the lite endpoint
struct LiteCursor {
    form: Vec<(String, String)>,
    seen: HashSet<String>,
    page: usize,
}

impl LiteCursor {
    fn new(form: Vec<(String, String)>) -> Self {
        Self {
            form,
            seen: HashSet::new(),
            page: 0,
        }
    }

    fn set(&mut self, key: &str, value: String) {
        set_param(&mut self.form, key, value);
    }
}

/// Paging state of the `i.js` / `v.js` endpoints
struct JsonCursor {
    params: Vec<(String, String)>,
    seen: HashSet<String>,
    page: usize,
}

impl JsonCursor {
    fn new(params: Vec<(String, String)>) -> Self {
        Self {
            params,
            seen: HashSet::new(),
            page: 0,
        }
    }

    fn has(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    fn set(&mut self, key: &str, value: String) {
        set_param(&mut self.params, key, value);
    }

    /// Move to the page named by the response's `next` link
    fn advance(mut self, data: &Value) -> Option<Self> {
        if self.page >= MAX_JSON_PAGES {
            return None;
        }
        let offset = data.get("next").and_then(Value::as_str).and_then(next_offset)?;
        self.set("s", offset);
        Some(self)
    }
}

#[derive(Debug, Clone, Copy)]
enum AnswerStage {
    Abstract,
    Related,
}

/// Maps a JSON row to its dedup key and output record
type RowMapper = fn(&Value) -> Option<(String, ResultRecord)>;

fn image_row(row: &Value) -> Option<(String, ResultRecord)> {
    let image = row.get("image").and_then(Value::as_str).filter(|s| !s.is_empty())?;

    let record = record([
        ("title", field(row, "title")),
        ("image", Value::String(normalize_url(image))),
        ("thumbnail", url_field(row, "thumbnail")),
        ("url", url_field(row, "url")),
        ("height", field(row, "height")),
        ("width", field(row, "width")),
        ("source", field(row, "source")),
    ]);

    Some((image.to_string(), record))
}

fn video_row(row: &Value) -> Option<(String, ResultRecord)> {
    let content = row.get("content").and_then(Value::as_str)?;
    let record = row.as_object()?.clone();
    Some((content.to_string(), record))
}

fn abstract_records(data: &Value) -> Vec<ResultRecord> {
    let text = match data.get("AbstractText").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text,
        _ => return Vec::new(),
    };

    vec![record([
        ("icon", Value::Null),
        ("text", Value::String(text.to_string())),
        ("topic", Value::Null),
        ("url", field(data, "AbstractURL")),
    ])]
}

fn related_records(data: &Value) -> Vec<ResultRecord> {
    let Some(topics) = data.get("RelatedTopics").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for row in topics {
        match row.get("Name").and_then(Value::as_str).filter(|s| !s.is_empty()) {
            Some(name) => {
                let nested = row.get("Topics").and_then(Value::as_array);
                for sub in nested.into_iter().flatten() {
                    records.extend(topic_record(sub, Some(name)));
                }
            }
            None => records.extend(topic_record(row, None)),
        }
    }
    records
}

fn topic_record(row: &Value, topic: Option<&str>) -> Option<ResultRecord> {
    let text = row.get("Text").and_then(Value::as_str)?;
    let icon = row
        .get("Icon")
        .and_then(|icon| icon.get("URL"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|path| format!("{}{}", DUCKDUCKGO_URL, path))
        .unwrap_or_default();

    Some(record([
        ("icon", Value::String(icon)),
        ("text", Value::String(text.to_string())),
        ("topic", topic.map_or(Value::Null, |t| Value::String(t.to_string()))),
        ("url", field(row, "FirstURL")),
    ]))
}

/// One parsed lite result
#[derive(Debug, Clone, PartialEq)]
struct LiteResult {
    title: String,
    href: String,
    body: String,
}

impl LiteResult {
    fn into_record(self) -> ResultRecord {
        record([
            ("title", Value::String(self.title)),
            ("href", Value::String(normalize_url(&self.href))),
            ("body", Value::String(self.body)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NextPage {
    offset: String,
    vqd: Option<String>,
}

#[derive(Debug, Default)]
struct LitePage {
    results: Vec<LiteResult>,
    next: Option<NextPage>,
}

fn parse_lite_page(html: &str) -> LitePage {
    if html.contains("No more results.") {
        return LitePage::default();
    }

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    // Results live in the last table; a link row opens a result and the
    // snippet row after it fills in the body.
    if let Some(table) = document.select(&TABLE).last() {
        let mut pending: Option<LiteResult> = None;

        for row in table.select(&ROW) {
            if let Some(link) = row.select(&RESULT_LINK).next() {
                results.extend(pending.take());

                let href = link.value().attr("href").unwrap_or_default();
                if href.is_empty() {
                    continue;
                }
                pending = Some(LiteResult {
                    title: collapse_whitespace(&link.text().collect::<String>()),
                    href: href.to_string(),
                    body: String::new(),
                });
            } else if let Some(snippet) = row.select(&SNIPPET).next() {
                if let Some(result) = pending.as_mut() {
                    result.body = collapse_whitespace(&snippet.text().collect::<String>());
                }
            }
        }

        results.extend(pending);
    }

    LitePage {
        results,
        next: next_page(&document),
    }
}

/// The form behind the "Next Page" button carries the offset and token
fn next_page(document: &Html) -> Option<NextPage> {
    document.select(&FORM).find_map(|form| {
        let inputs: Vec<_> = form.select(&INPUT).collect();

        let is_next = inputs
            .iter()
            .any(|input| input.value().attr("value").is_some_and(|v| v.contains("ext")));
        if !is_next {
            return None;
        }

        let value_of = |name: &str| {
            inputs
                .iter()
                .find(|input| input.value().attr("name") == Some(name))
                .and_then(|input| input.value().attr("value"))
                .map(str::to_string)
        };

        Some(NextPage {
            offset: value_of("s")?,
            vqd: value_of("vqd"),
        })
    })
}

fn extract_vqd(text: &str) -> Option<String> {
    VQD_RE
        .captures(text)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str().to_string())
}

/// Offset from a `next` link such as `i.js?q=x&s=100&vqd=...`
fn next_offset(next: &str) -> Option<String> {
    next.rsplit("s=")
        .next()
        .and_then(|tail| tail.split('&').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Safe search code used by the lite and video endpoints
fn kp_code(safesearch: SafeSearch) -> &'static str {
    match safesearch {
        SafeSearch::On => "1",
        SafeSearch::Moderate => "-1",
        SafeSearch::Off => "-2",
    }
}

fn image_safesearch_code(safesearch: SafeSearch) -> &'static str {
    match safesearch {
        SafeSearch::On | SafeSearch::Moderate => "1",
        SafeSearch::Off => "-1",
    }
}

fn prefixed(name: &str, value: Option<&str>) -> String {
    value.map(|v| format!("{}:{}", name, v)).unwrap_or_default()
}

fn normalize_url(url: &str) -> String {
    urlencoding::decode(url)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| url.to_string())
        .replace(' ', "+")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field(row: &Value, key: &str) -> Value {
    row.get(key).cloned().unwrap_or(Value::Null)
}

fn url_field(row: &Value, key: &str) -> Value {
    match row.get(key).and_then(Value::as_str) {
        Some(url) => Value::String(normalize_url(url)),
        None => Value::Null,
    }
}

fn record<const N: usize>(fields: [(&str, Value); N]) -> ResultRecord {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn set_param(params: &mut Vec<(String, String)>, key: &str, value: String) {
    match params.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => params.push((key.to_string(), value)),
    }
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
