// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use base64::Engine;
use reqwest::Client;

use crate::auth::credentials::Credentials;
use crate::helpers::time::{get_instant, Clock};
use crate::provider::{IdentityProvider, TokenGrant};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// `Basic base64(username:password)`
pub fn basic_auth(username: &str, password: &str) -> String {
    let raw = format!("{}:{}", username, password);
    format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
}

/// Clock that only moves when told to. Clones share the same offset.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: tokio::time::Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: get_instant(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> tokio::time::Instant {
        self.origin + *self.offset.lock().unwrap()
    }
}

enum Scripted {
    Grant(TokenGrant),
    Failure(String),
}

/// Identity provider answering from a script, in call order.
///
/// Each entry may carry a delay that is awaited after the entry is taken, so
/// concurrent callers get their responses in the order they called.
#[derive(Clone, Default)]
pub struct FakeProvider {
    calls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<(Duration, Scripted)>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, token: &str, expires_in: u64) -> Self {
        self.respond_after(Duration::ZERO, token, expires_in)
    }

    pub fn respond_after(self, delay: Duration, token: &str, expires_in: u64) -> Self {
        let grant = TokenGrant { access_token: token.to_owned(), expires_in };
        self.push(delay, Scripted::Grant(grant))
    }

    pub fn fail(self, reason: &str) -> Self {
        self.push(Duration::ZERO, Scripted::Failure(reason.to_owned()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, delay: Duration, entry: Scripted) -> Self {
        self.script.lock().unwrap().push_back((delay, entry));
        self
    }
}

impl IdentityProvider for FakeProvider {
    async fn request_token(&self, _credentials: &Credentials) -> Result<TokenGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();

        match next {
            Some((delay, entry)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match entry {
                    Scripted::Grant(grant) => Ok(grant),
                    Scripted::Failure(reason) => Err(anyhow!(reason)),
                }
            }
            None => Err(anyhow!("no scripted response left")),
        }
    }
}
