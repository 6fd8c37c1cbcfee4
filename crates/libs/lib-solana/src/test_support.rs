//! # Mock Upstream
//!
//! In-process stand-in for the Axiom and Helius endpoints, bound to
//! `127.0.0.1:0`. Each route replays scripted responses in order, then its
//! `always` response, and records what it received.
//!
//! | Path | Plays |
//! |---|---|
//! | `POST /refresh-access-token` | Axiom auth |
//! | `GET /meme-trending` | Axiom trending feed |
//! | `POST /rpc` | Helius, dispatched on `method` to the `asset` / `holders` routes |

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A canned response.
#[derive(Debug, Clone)]
pub struct Scripted {
    status: u16,
    body: String,
    content_type: &'static str,
    set_cookies: Vec<String>,
    delay: Option<Duration>,
}

impl Scripted {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
            set_cookies: Vec::new(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "text/plain",
            set_cookies: Vec::new(),
            delay: None,
        }
    }

    /// Successful JSON-RPC envelope around `result`.
    pub fn rpc_result(result: Value) -> Self {
        Self::json(200, json!({ "jsonrpc": "2.0", "id": "mock", "result": result }))
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookies.push(cookie.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn render(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        for cookie in &self.set_cookies {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

/// One mocked endpoint.
#[derive(Default)]
pub struct Route {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<Scripted>>,
    hits: AtomicUsize,
    cookies: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
}

impl Route {
    /// Queue a one-off response.
    pub fn push(&self, response: Scripted) {
        self.queue.lock().unwrap().push_back(response);
    }

    /// Response used once the queue is drained.
    pub fn always(&self, response: Scripted) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// `Cookie` header of every request, in arrival order.
    pub fn cookies(&self) -> Vec<String> {
        self.cookies.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// JSON bodies of every request, in arrival order.
    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    async fn respond(&self, headers: &HeaderMap, query: Option<String>, body: Option<Value>) -> Response {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if let Some(cookie) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            self.cookies.lock().unwrap().push(cookie.to_string());
        }
        if let Some(query) = query {
            self.queries.lock().unwrap().push(query);
        }
        if let Some(body) = body {
            self.bodies.lock().unwrap().push(body);
        }

        let scripted = self.queue.lock().unwrap().pop_front();
        let scripted = scripted
            .or_else(|| self.fallback.lock().unwrap().clone())
            .unwrap_or_else(|| Scripted::raw(500, "unscripted request"));

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.render()
    }
}

struct Routes {
    refresh: Arc<Route>,
    trending: Arc<Route>,
    asset: Arc<Route>,
    holders: Arc<Route>,
}

/// Running mock server; it stops with the test runtime.
pub struct MockUpstream {
    pub base_url: String,
    pub refresh: Arc<Route>,
    pub trending: Arc<Route>,
    pub asset: Arc<Route>,
    pub holders: Arc<Route>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let routes = Arc::new(Routes {
            refresh: Arc::default(),
            trending: Arc::default(),
            asset: Arc::default(),
            holders: Arc::default(),
        });

        let app = Router::new()
            .route("/refresh-access-token", post(handle_refresh))
            .route("/meme-trending", get(handle_trending))
            .route("/rpc", post(handle_rpc))
            .with_state(Arc::clone(&routes));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock upstream should bind");
        let addr = listener.local_addr().expect("mock upstream should have an address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            refresh: Arc::clone(&routes.refresh),
            trending: Arc::clone(&routes.trending),
            asset: Arc::clone(&routes.asset),
            holders: Arc::clone(&routes.holders),
        }
    }

    /// Helius-style RPC URL on the mock.
    pub fn rpc_url(&self) -> String {
        format!("{}/rpc?api-key=test", self.base_url)
    }
}

async fn handle_refresh(State(routes): State<Arc<Routes>>, headers: HeaderMap) -> Response {
    routes.refresh.respond(&headers, None, None).await
}

async fn handle_trending(
    State(routes): State<Arc<Routes>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    routes.trending.respond(&headers, query, None).await
}

async fn handle_rpc(State(routes): State<Arc<Routes>>, headers: HeaderMap, body: Bytes) -> Response {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let route = match request["method"].as_str() {
        Some("getAsset") => &routes.asset,
        Some("getTokenLargestAccounts") => &routes.holders,
        _ => return (StatusCode::BAD_REQUEST, "unknown method").into_response(),
    };
    route.respond(&headers, None, Some(request)).await
}

// region: --- Fixtures
/// Trending feed entry in Axiom's shape.
pub fn market_item(address: &str, name: &str, ticker: &str) -> Value {
    json!({
        "tokenAddress": address,
        "tokenName": name,
        "tokenTicker": ticker,
        "tokenImage": format!("https://img.example/{}.png", ticker),
        "supply": 1_000_000_000,
        "top10Holders": 18.5,
        "marketCapSol": 420.5,
        "marketCapPercentChange": 12.25,
        "liquiditySol": 85.0,
        "liquidityToken": 250_000_000.0,
        "volumeSol": 1337.0,
        "buyCount": 640,
        "sellCount": 410,
        "website": "",
        "twitter": format!("https://x.com/{}", ticker),
        "telegram": null,
        "discord": null
    })
}

/// `getAsset` result for a fungible token.
pub fn asset_result(name: &str, symbol: &str, supply: f64, decimals: u32) -> Value {
    json!({
        "interface": "FungibleToken",
        "id": "MockMint",
        "content": { "metadata": { "name": name, "symbol": symbol, "description": "A test token" } },
        "token_info": { "supply": supply, "decimals": decimals }
    })
}

/// `getTokenLargestAccounts` result with the given ui amounts, largest first.
pub fn holders_result(ui_amounts: &[f64]) -> Value {
    let value: Vec<Value> = ui_amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            json!({
                "address": format!("Holder{}", i),
                "amount": format!("{}", amount),
                "decimals": 0,
                "uiAmount": amount,
                "uiAmountString": format!("{}", amount)
            })
        })
        .collect();
    json!({ "context": { "slot": 1 }, "value": value })
}
// endregion: --- Fixtures
