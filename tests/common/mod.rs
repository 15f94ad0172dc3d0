//! Shared test harness for integration tests.
//!
//! Provides [`ScriptedClient`], an in-memory [`CatalogClient`] whose answers
//! and timing are controlled by the test, and [`TestHarness`] which wraps a
//! full [`AppContext`] around it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use movieskyy::catalog::{CatalogClient, FetchError};
use movieskyy::config::Config;
use movieskyy::server::{create_router, AppContext};
use movieskyy_common::{CatalogMode, CatalogPage, Category};

/// Build a catalog page whose records carry the given titles, in order.
pub fn page_of(titles: &[&str]) -> CatalogPage {
    let results: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "id": i as u64 + 1,
                "title": title,
                "overview": format!("{title} overview"),
                "poster_path": format!("/poster{}.jpg", i + 1),
                "backdrop_path": format!("/backdrop{}.jpg", i + 1),
                "vote_average": 7.5,
                "release_date": "2024-03-15",
                "adult": false,
            })
        })
        .collect();

    serde_json::from_value(json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": titles.len(),
    }))
    .expect("valid catalog page")
}

/// Key used to script a mode: `category:popular`, `search:"batman"`.
pub fn mode_key(mode: &CatalogMode) -> String {
    mode.to_string()
}

pub fn category_key(category: Category) -> String {
    mode_key(&CatalogMode::category(category))
}

pub fn search_key(query: &str) -> String {
    mode_key(&CatalogMode::search(query))
}

/// A [`CatalogClient`] scripted per mode.
///
/// Unscripted modes answer with an empty page. A held mode blocks every
/// fetch for it until [`release`](Self::release) is called once per fetch.
#[derive(Default)]
pub struct ScriptedClient {
    calls: Mutex<Vec<(CatalogMode, u32)>>,
    responses: Mutex<HashMap<String, Vec<Result<CatalogPage, FetchError>>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue an answer for `key`. The last queued answer repeats.
    pub fn respond(&self, key: impl Into<String>, outcome: Result<CatalogPage, FetchError>) {
        self.responses
            .lock()
            .entry(key.into())
            .or_default()
            .push(outcome);
    }

    /// Make fetches for `key` wait until released.
    pub fn hold(&self, key: impl Into<String>) {
        self.gates
            .lock()
            .insert(key.into(), Arc::new(Semaphore::new(0)));
    }

    /// Let one held fetch for `key` proceed.
    pub fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().get(key) {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<(CatalogMode, u32)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(mode, _)| mode_key(mode) == key)
            .count()
    }

    fn next_response(&self, key: &str) -> Result<CatalogPage, FetchError> {
        let mut responses = self.responses.lock();
        match responses.get_mut(key) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) => queue[0].clone(),
            None => Ok(page_of(&[])),
        }
    }
}

#[async_trait]
impl CatalogClient for ScriptedClient {
    async fn fetch_catalog(
        &self,
        mode: &CatalogMode,
        page: u32,
    ) -> Result<CatalogPage, FetchError> {
        let key = mode_key(mode);
        self.calls.lock().push((mode.clone(), page));

        let gate = self.gates.lock().get(&key).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.next_response(&key)
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub client: Arc<ScriptedClient>,
}

impl TestHarness {
    /// Harness with default configuration and no view session.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let client = ScriptedClient::new();
        let ctx = AppContext::new(config, client.clone());
        Self { ctx, client }
    }

    /// Harness with a running view session. Must be called inside a runtime.
    pub fn with_view_session(client: Arc<ScriptedClient>) -> Self {
        let ctx = AppContext::new(Config::default(), client.clone()).with_view_session();
        Self { ctx, client }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    /// Start an Axum server on a random port.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Collect a response body into a string.
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.expect("failed to read body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).expect("body is not json")
}
