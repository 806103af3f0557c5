// Concurrent misses for the same key.
//  - default: every caller hits the provider, last write wins, cache stays whole
//  - single flight: one provider call, every caller gets its token

#[cfg(test)]
mod test {

    use std::sync::Arc;
    use std::time::Duration;

    use crate::auth::authenticator::Authenticator;
    use crate::auth::credentials::Credentials;
    use crate::cache::token_cache::TokenCache;
    use crate::helpers::time::Clock;
    use crate::tests::common::{FakeProvider, ManualClock};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_refresh_last_write_wins() {
        // first caller gets the slow response, so its write lands last
        let provider = FakeProvider::new()
            .respond_after(Duration::from_millis(200), "SLOW", 60)
            .respond_after(Duration::from_millis(10), "FAST", 60);
        let clock = ManualClock::new();
        let auth = Authenticator::new(provider.clone(), TokenCache::new())
            .with_clock(Arc::new(clock.clone()));
        let creds = Credentials::new("u1", "p1");

        let (first, second) = tokio::join!(auth.obtain_token(&creds), auth.obtain_token(&creds));

        assert_eq!(first, Ok("SLOW".to_string()));
        assert_eq!(second, Ok("FAST".to_string()));
        assert_eq!(provider.calls(), 2);

        assert_eq!(auth.cache().len().await, 1);
        let entry = auth.cache().get(&creds.cache_key(), clock.now()).await;
        assert_eq!(entry.map(|e| e.token), Some("SLOW".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn single_flight_shares_one_authentication() {
        let provider = FakeProvider::new().respond_after(Duration::from_millis(100), "T1", 60);
        let auth = Arc::new(
            Authenticator::new(provider.clone(), TokenCache::new()).with_single_flight(true),
        );

        let callers: Vec<_> = (0..8)
            .map(|_| {
                let auth = auth.clone();
                tokio::spawn(async move { auth.obtain_token(&Credentials::new("u1", "p1")).await })
            })
            .collect();

        for caller in callers {
            assert_eq!(caller.await.unwrap(), Ok("T1".to_string()));
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn single_flight_does_not_serialize_different_keys() {
        let provider = FakeProvider::new()
            .respond_after(Duration::from_millis(300), "A", 60)
            .respond_after(Duration::from_millis(300), "B", 60);
        let auth = Authenticator::new(provider.clone(), TokenCache::new()).with_single_flight(true);

        let alice = Credentials::new("alice", "pw");
        let bob = Credentials::new("bob", "pw");
        let started = std::time::Instant::now();
        let (a, b) = tokio::join!(auth.obtain_token(&alice), auth.obtain_token(&bob));

        assert_eq!(a, Ok("A".to_string()));
        assert_eq!(b, Ok("B".to_string()));
        assert!(started.elapsed() < Duration::from_millis(550));
    }
}
