//! Debounced company search.
//!
//! Every keystroke calls [`AutocompleteDebouncer::query`]. Each call takes
//! a ticket, waits the debounce delay, and only queries the registry if no
//! newer call arrived meanwhile. Superseded calls resolve to `None`, as do
//! results that come back after a newer call started.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::ClientError;
use crate::registry::{CompanySuggestion, RegistryClient, MIN_QUERY_CHARS};

/// Default delay after the last keystroke.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Something that can answer a company search.
pub trait CompanySearch: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<CompanySuggestion>, ClientError>> + Send;
}

impl CompanySearch for RegistryClient {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<CompanySuggestion>, ClientError>> + Send {
        self.autocomplete(query)
    }
}

/// Coalesces rapid queries into one registry call.
#[derive(Debug)]
pub struct AutocompleteDebouncer<S> {
    search: S,
    delay: Duration,
    latest: AtomicU64,
}

impl<S: CompanySearch> AutocompleteDebouncer<S> {
    pub fn new(search: S, delay: Duration) -> Self {
        Self {
            search,
            delay,
            latest: AtomicU64::new(0),
        }
    }

    /// Debouncer with the delay from `KLAAR_SEARCH_DEBOUNCE_MS`, or
    /// [`DEFAULT_DEBOUNCE`].
    pub fn from_env(search: S) -> Self {
        let delay = std::env::var("KLAAR_SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE);
        Self::new(search, delay)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn inner(&self) -> &S {
        &self.search
    }

    /// Submit the current input.
    ///
    /// Returns `Ok(None)` if a newer query superseded this one, and an
    /// immediate empty list for queries too short to search.
    pub async fn query(&self, text: &str) -> Result<Option<Vec<CompanySuggestion>>, ClientError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if text.trim().chars().count() < MIN_QUERY_CHARS {
            return Ok(Some(Vec::new()));
        }

        tokio::time::sleep(self.delay).await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::trace!(ticket, "search superseded before sending");
            return Ok(None);
        }

        let results = self.search.search(text).await?;
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::trace!(ticket, "search superseded while in flight");
            return Ok(None);
        }
        Ok(Some(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeSearch {
        queries: Mutex<Vec<String>>,
    }

    impl CompanySearch for FakeSearch {
        async fn search(&self, query: &str) -> Result<Vec<CompanySuggestion>, ClientError> {
            self.queries.lock().push(query.to_string());
            Ok(vec![CompanySuggestion {
                company_id: "1".into(),
                reg_code: "12345678".into(),
                name: format!("{query} OÜ"),
                status: Some("R".into()),
                legal_address: None,
                zip_code: None,
                url: None,
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_keystroke_searches() {
        let debouncer = AutocompleteDebouncer::new(FakeSearch::default(), DEFAULT_DEBOUNCE);

        let (first, second) = tokio::join!(debouncer.query("Kla"), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.query("Klaa").await
        });

        assert_eq!(first.unwrap(), None);
        let hits = second.unwrap().unwrap();
        assert_eq!(hits[0].name, "Klaa OÜ");
        assert_eq!(*debouncer.inner().queries.lock(), vec!["Klaa".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_queries_both_search() {
        let debouncer = AutocompleteDebouncer::new(FakeSearch::default(), DEFAULT_DEBOUNCE);
        assert!(debouncer.query("Kla").await.unwrap().is_some());
        assert!(debouncer.query("Klaa").await.unwrap().is_some());
        assert_eq!(debouncer.inner().queries.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_returns_immediately_without_search() {
        let debouncer = AutocompleteDebouncer::new(FakeSearch::default(), DEFAULT_DEBOUNCE);
        let start = tokio::time::Instant::now();
        assert_eq!(debouncer.query(" K ").await.unwrap(), Some(vec![]));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(debouncer.inner().queries.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_supersedes_pending_search() {
        let debouncer = AutocompleteDebouncer::new(FakeSearch::default(), DEFAULT_DEBOUNCE);
        let (first, second) = tokio::join!(debouncer.query("Kla"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            debouncer.query("K").await
        });
        assert_eq!(first.unwrap(), None);
        assert_eq!(second.unwrap(), Some(vec![]));
        assert!(debouncer.inner().queries.lock().is_empty());
    }
}
