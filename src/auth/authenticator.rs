use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::credentials::Credentials;
use crate::auth::diagnostics;
use crate::auth::error::AuthError;
use crate::auth::inflight::KeyedGuards;
use crate::cache::token::CachedToken;
use crate::cache::token_cache::{Lookup, TokenCache};
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::provider::IdentityProvider;

static OUTCOME_OK: &str = "ok";
static OUTCOME_ERROR: &str = "error";
static REASON_LIFETIME: &str = "lifetime";

/// Serves access tokens from the cache, authenticating against the identity
/// provider on a miss or after expiry.
///
/// Without single flight, concurrent misses for one key each call the
/// provider and the last response written wins.
pub struct Authenticator<P> {
    provider: P,
    cache: TokenCache,
    clock: Arc<dyn Clock>,
    single_flight: Option<KeyedGuards>,
}

impl<P: IdentityProvider> Authenticator<P> {
    pub fn new(provider: P, cache: TokenCache) -> Self {
        Self {
            provider,
            cache,
            clock: Arc::new(SystemClock),
            single_flight: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Allow at most one in-flight authentication per cache key.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled.then(KeyedGuards::new);
        self
    }

    #[cfg(test)]
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Return a valid access token for `credentials`.
    pub async fn obtain_token(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let key = credentials.cache_key();
        let metrics = get_metrics().await;

        let lookup = self.cache.lookup(&key, self.clock.now()).await;
        metrics.cache_lookups.with_label_values(&[lookup.label()]).inc();
        if let Lookup::Hit(cached) = lookup {
            return Ok(self.serve_cached(credentials, cached));
        }

        let _guard = match &self.single_flight {
            Some(guards) => {
                let guard = guards.acquire(&key).await;
                // another caller may have refreshed the entry while we waited
                if let Some(cached) = self.cache.get(&key, self.clock.now()).await {
                    return Ok(self.serve_cached(credentials, cached));
                }
                Some(guard)
            }
            None => None,
        };

        self.authenticate(&key, credentials).await
    }

    fn serve_cached(&self, credentials: &Credentials, cached: CachedToken) -> String {
        debug!(
            username = %credentials.username,
            remaining_secs = cached.remaining(self.clock.now()).as_secs(),
            "token cache hit"
        );
        diagnostics::log_cached_token(&cached.token);
        cached.token
    }

    async fn authenticate(&self, key: &str, credentials: &Credentials) -> Result<String, AuthError> {
        let metrics = get_metrics().await;
        let requested_at = self.clock.now();
        let start = get_instant();
        metrics.provider_requests.inc();

        let grant = match self.provider.request_token(credentials).await {
            Ok(grant) => {
                metrics.provider_duration.with_label_values(&[OUTCOME_OK]).observe(start.elapsed().as_secs_f64());
                grant
            }
            Err(e) => {
                metrics.provider_duration.with_label_values(&[OUTCOME_ERROR]).observe(start.elapsed().as_secs_f64());
                metrics.provider_failures.with_label_values(&[failure_reason(&e)]).inc();
                warn!(username = %credentials.username, error = %format!("{:#}", e), "authentication failed");
                return Err(AuthError::AuthFailure);
            }
        };

        let Some(cached) = CachedToken::new(grant.access_token, requested_at, grant.expires_in) else {
            metrics.provider_failures.with_label_values(&[REASON_LIFETIME]).inc();
            warn!(
                username = %credentials.username,
                expires_in = grant.expires_in,
                "authentication failed: token lifetime out of range"
            );
            return Err(AuthError::AuthFailure);
        };
        if cached.is_valid_at(self.clock.now()) {
            self.cache.set(key, cached.clone()).await;
            info!(username = %credentials.username, expires_in = grant.expires_in, "token cached");
        } else {
            warn!(
                username = %credentials.username,
                expires_in = grant.expires_in,
                "token already expired on arrival, not cached"
            );
        }

        Ok(cached.token)
    }
}

fn failure_reason(e: &anyhow::Error) -> &'static str {
    match e.chain().find_map(|cause| cause.downcast_ref::<reqwest::Error>()) {
        Some(err) if err.is_timeout() => "timeout",
        Some(_) => "transport",
        None => "response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{FakeProvider, ManualClock};
    use std::time::Duration;

    #[tokio::test]
    async fn zero_lifetime_token_is_returned_but_not_cached() {
        let provider = FakeProvider::new().respond("T0", 0).respond("T1", 60);
        let clock = ManualClock::new();
        let auth = Authenticator::new(provider.clone(), TokenCache::new())
            .with_clock(Arc::new(clock.clone()));
        let creds = Credentials::new("u1", "p1");

        assert_eq!(auth.obtain_token(&creds).await, Ok("T0".to_string()));
        assert!(auth.cache().is_empty().await);

        assert_eq!(auth.obtain_token(&creds).await, Ok("T1".to_string()));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn expiry_is_measured_from_request_time() {
        let clock = ManualClock::new();
        let provider = FakeProvider::new().respond("T1", 60);
        let auth = Authenticator::new(provider, TokenCache::new())
            .with_clock(Arc::new(clock.clone()));
        let t0 = clock.now();

        auth.obtain_token(&Credentials::new("u1", "p1")).await.unwrap();

        let entry = auth.cache().peek(&Credentials::new("u1", "p1").cache_key()).await.unwrap();
        assert_eq!(entry.expires_at, t0 + Duration::from_secs(60));
    }

    #[test]
    fn plain_errors_are_response_failures() {
        assert_eq!(failure_reason(&anyhow::anyhow!("token endpoint returned 401")), "response");
    }
}
