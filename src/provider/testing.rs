//! In-memory provider for tests

use super::error::ProviderError;
use super::options::{ImageOptions, TextOptions, VideoOptions};
use super::traits::{ProviderSession, RecordStream, ResultRecord, SearchProvider};
use crate::search::SearchOptions;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What every stream of a [`StaticProvider`] yields
#[derive(Clone)]
pub enum Supply {
    /// A fixed list of records
    Records(Vec<ResultRecord>),
    /// Numbered records without end
    Endless,
    /// `n` good records, then an error
    FailAfter(usize),
}

/// Shared counters for inspecting provider use from a test
#[derive(Default)]
pub struct Probe {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub pulled: AtomicUsize,
    pub calls: Mutex<Vec<(String, SearchOptions)>>,
}

impl Probe {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, SearchOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct StaticProvider {
    supply: Supply,
    probe: Arc<Probe>,
}

impl StaticProvider {
    pub fn new(supply: Supply) -> Self {
        Self {
            supply,
            probe: Arc::new(Probe::default()),
        }
    }

    /// Provider yielding records titled `title-0` .. `title-{n-1}`
    pub fn numbered(n: usize) -> Self {
        Self::new(Supply::Records((0..n).map(numbered_record).collect()))
    }

    pub fn probe(&self) -> Arc<Probe> {
        self.probe.clone()
    }
}

pub fn numbered_record(i: usize) -> ResultRecord {
    match json!({ "title": format!("title-{}", i), "href": format!("https://example.com/{}", i) }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn open(&self) -> Result<Box<dyn ProviderSession>, ProviderError> {
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticSession {
            supply: self.supply.clone(),
            probe: self.probe.clone(),
        }))
    }
}

struct StaticSession {
    supply: Supply,
    probe: Arc<Probe>,
}

impl StaticSession {
    fn stream(&self, category: &str, options: SearchOptions) -> RecordStream<'_> {
        self.probe
            .calls
            .lock()
            .unwrap()
            .push((category.to_string(), options));

        let items: Box<dyn Iterator<Item = Result<ResultRecord, ProviderError>> + Send> =
            match &self.supply {
                Supply::Records(records) => Box::new(records.clone().into_iter().map(Ok)),
                Supply::Endless => Box::new((0..).map(|i| Ok(numbered_record(i)))),
                Supply::FailAfter(n) => {
                    let n = *n;
                    Box::new((0..=n).map(move |i| {
                        if i < n {
                            Ok(numbered_record(i))
                        } else {
                            Err(ProviderError::Http(500))
                        }
                    }))
                }
            };

        let probe = self.probe.clone();
        stream::iter(items)
            .map(move |item| {
                probe.pulled.fetch_add(1, Ordering::SeqCst);
                item
            })
            .boxed()
    }
}

impl Drop for StaticSession {
    fn drop(&mut self) {
        self.probe.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl ProviderSession for StaticSession {
    fn text<'a>(&'a self, _keywords: &'a str, options: &'a TextOptions) -> RecordStream<'a> {
        self.stream("text", SearchOptions::Text(options.clone()))
    }

    fn answers<'a>(&'a self, _keywords: &'a str) -> RecordStream<'a> {
        self.stream("answers", SearchOptions::Answers)
    }

    fn images<'a>(&'a self, _keywords: &'a str, options: &'a ImageOptions) -> RecordStream<'a> {
        self.stream("images", SearchOptions::Images(options.clone()))
    }

    fn videos<'a>(&'a self, _keywords: &'a str, options: &'a VideoOptions) -> RecordStream<'a> {
        self.stream("videos", SearchOptions::Videos(options.clone()))
    }
}
