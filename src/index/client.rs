//! Blocking HTTP client for the document index.
//!
//! A thin wrapper over the index's REST surface: availability probing,
//! one-shot index creation, single-document writes, and a bounded
//! match-all search. One instance per subcommand; the only connection
//! state is reqwest's pool.

use std::thread;

use anyhow::{Context, Result, bail};
use log::info;
use serde_json::{Value, json};

use super::DocumentSink;
use super::schema;
use crate::config::{IndexConfig, RetryPolicy};

pub struct IndexClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    index: String,
}

impl IndexClient {
    pub fn new(cfg: &IndexConfig) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            index: cfg.index.clone(),
        }
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.index)
    }

    /// Health probe against the endpoint root. Any transport error or
    /// non-success status counts as "not available yet".
    pub fn ping(&self) -> bool {
        self.http
            .head(&self.endpoint)
            .send()
            .is_ok_and(|resp| resp.status().is_success())
    }

    /// Block until the endpoint answers the health probe, sleeping between
    /// attempts per `retry`. Exhausting the policy is fatal; nothing else
    /// in the run makes sense without a reachable index.
    pub fn wait_until_available(&self, retry: &RetryPolicy) -> Result<()> {
        for attempt in 1..=retry.max_attempts {
            if self.ping() {
                return Ok(());
            }
            if attempt < retry.max_attempts {
                let delay = retry.sleep_duration();
                info!(
                    "index endpoint not available yet (attempt {attempt}/{}), retrying in {:.1}s",
                    retry.max_attempts,
                    delay.as_secs_f64()
                );
                thread::sleep(delay);
            }
        }
        bail!(
            "index endpoint {} did not become available after {} attempts",
            self.endpoint,
            retry.max_attempts
        )
    }

    /// Whether the index already exists.
    pub fn index_exists(&self) -> Result<bool> {
        let resp = self
            .http
            .head(self.index_url())
            .send()
            .with_context(|| format!("probe index {}", self.index))?;
        Ok(resp.status().is_success())
    }

    /// Create the index with the static schema.
    pub fn create_index(&self) -> Result<()> {
        let resp = self
            .http
            .put(self.index_url())
            .json(&schema::index_body())
            .send()
            .with_context(|| format!("create index {}", self.index))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("create index {} failed: {status}: {body}", self.index);
        }
        Ok(())
    }

    /// Idempotent provisioning: wait for the endpoint, then create the
    /// index unless it is already there. Returns whether it was created.
    pub fn ensure_index(&self, retry: &RetryPolicy) -> Result<bool> {
        self.wait_until_available(retry)?;
        if self.index_exists()? {
            info!("index '{}' already exists", self.index);
            return Ok(false);
        }
        self.create_index()?;
        info!("index '{}' created", self.index);
        Ok(true)
    }

    /// Index one document, under a caller-chosen id (upsert) or appended
    /// with a server-assigned id.
    pub fn write_document(&self, id: Option<&str>, document: &Value) -> Result<()> {
        let request = match id {
            Some(id) => self.http.put(format!("{}/_doc/{id}", self.index_url())),
            None => self.http.post(format!("{}/_doc", self.index_url())),
        };
        let resp = request
            .json(document)
            .send()
            .with_context(|| format!("send document to index {}", self.index))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("index document failed: {status}: {body}");
        }
        Ok(())
    }

    /// One bounded match-all query; returns each hit's `_source`, or
    /// `None` when the response has no `hits.hits` envelope at all. There
    /// is no pagination, so at most `size` documents come back.
    pub fn search_match_all(&self, size: usize) -> Result<Option<Vec<Value>>> {
        let body = json!({ "size": size, "query": { "match_all": {} } });
        let resp = self
            .http
            .post(format!("{}/_search", self.index_url()))
            .json(&body)
            .send()
            .with_context(|| format!("search index {}", self.index))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            bail!("search index {} failed: {status}: {text}", self.index);
        }
        let envelope: Value = resp.json().context("decode search response")?;
        Ok(extract_sources(&envelope))
    }
}

impl DocumentSink for IndexClient {
    fn write(&self, id: Option<&str>, document: &Value) -> Result<()> {
        self.write_document(id, document)
    }
}

/// Pull the `_source` documents out of a search response. A response
/// without the expected `hits.hits` array yields `None`; an empty hit
/// list is a real result and yields `Some` of an empty vec.
pub fn extract_sources(envelope: &Value) -> Option<Vec<Value>> {
    envelope
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source"))
                .cloned()
                .collect()
        })
}
