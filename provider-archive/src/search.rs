//! Search Index Client
//!
//! Issues paginated search requests against the archive's search endpoint,
//! decodes heterogeneous JSON tolerantly, merges and dedupes results on
//! append, and tracks "has more" state. The session lives behind a lock
//! inside the client; consumers only ever read snapshots.
//!
//! A stale response can never overwrite newer state: every fresh search bumps
//! a generation counter and responses are applied only while their generation
//! is still current.

use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::ArchiveSettings;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{ArchiveError, Result};
use crate::query::build_query;
use crate::types::{CatalogItem, MediaCategory, MediaKind, SearchEnvelope};

/// Fields requested from the search endpoint. Limited to the attributes of
/// [`CatalogItem`].
const RESULT_FIELDS: [&str; 6] = [
    "identifier",
    "title",
    "creator",
    "date",
    "description",
    "mediatype",
];

/// Popularity proxy used to order results.
const SORT_ORDER: &str = "downloads desc";

/// Read-only projection of the current search session.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
}

/// Parameters of the last issued search, kept so `load_more` can re-issue
/// them.
#[derive(Debug, Clone)]
struct SearchParams {
    term: String,
    kind_hint: MediaKind,
    category: MediaCategory,
}

#[derive(Debug, Default)]
struct SessionState {
    params: Option<SearchParams>,
    items: Vec<CatalogItem>,
    seen: HashSet<String>,
    page: u32,
    has_more: bool,
    is_loading: bool,
    is_loading_more: bool,
    error: Option<String>,
}

impl SessionState {
    fn clear_loading(&mut self) {
        self.is_loading = false;
        self.is_loading_more = false;
    }
}

/// Paginated search client for the archive catalog.
///
/// Multiple clients may run concurrently; each owns exactly one session.
pub struct ArchiveSearchClient {
    http: Arc<dyn HttpClient>,
    settings: ArchiveSettings,
    state: RwLock<SessionState>,
    generation: AtomicU64,
}

impl ArchiveSearchClient {
    pub fn new(http: Arc<dyn HttpClient>, settings: ArchiveSettings) -> Self {
        Self {
            http,
            settings,
            state: RwLock::new(SessionState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot the current session for UI consumption.
    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.read();
        SearchSnapshot {
            items: state.items.clone(),
            page: state.page,
            has_more: state.has_more,
            is_loading: state.is_loading,
            is_loading_more: state.is_loading_more,
            error: state.error.clone(),
        }
    }

    /// Run a search.
    ///
    /// With `append = false` the session resets and the first page is
    /// fetched; with `append = true` the next page extends the accumulated
    /// results, deduped on identifier. Local-only categories short-circuit
    /// before any network call and leave an empty session.
    #[instrument(skip(self), fields(term = %term, category = ?category, append))]
    pub async fn search(
        &self,
        term: &str,
        kind_hint: MediaKind,
        category: MediaCategory,
        append: bool,
    ) -> Result<()> {
        let Some(query) = build_query(term, category, kind_hint) else {
            debug!("Local-only category, skipping network search");
            let mut state = self.state.write();
            *state = SessionState::default();
            return Ok(());
        };

        let (generation, requested_page) = {
            let mut state = self.state.write();
            if append {
                // Guard and flag-set happen under one write lock so two
                // racing appends can never both pass, and an append can
                // never overlap a fresh search still in flight.
                if state.is_loading || state.is_loading_more || !state.has_more {
                    debug!("Page load already in flight or exhausted, ignoring append");
                    return Ok(());
                }
                state.is_loading_more = true;
            } else {
                state.params = Some(SearchParams {
                    term: term.to_string(),
                    kind_hint,
                    category,
                });
                state.items.clear();
                state.seen.clear();
                state.page = 0;
                state.has_more = true;
                state.error = None;
                state.is_loading = true;
                state.is_loading_more = false;
                self.generation.fetch_add(1, Ordering::SeqCst);
            }
            (self.generation.load(Ordering::SeqCst), state.page + 1)
        };

        self.fetch_page(&query, requested_page, generation).await
    }

    /// Fetch the next page with the parameters of the last search.
    ///
    /// No-op (zero network calls) while any request is already in flight or
    /// when the last page was short. The authoritative guard lives in
    /// [`search`](Self::search)'s append path; the flags are checked and set
    /// there under one lock.
    pub async fn load_more(&self) -> Result<()> {
        let params = {
            let state = self.state.read();
            match &state.params {
                Some(params) => params.clone(),
                None => return Ok(()),
            }
        };

        self.search(&params.term, params.kind_hint, params.category, true)
            .await
    }

    fn request_url(&self, query: &str, page: u32) -> String {
        let fields = RESULT_FIELDS
            .iter()
            .map(|f| format!("fl[]={}", f))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}/advancedsearch.php?q={}&{}&rows={}&page={}&sort[]={}&output=json",
            self.settings.base_url, query, fields, self.settings.page_size, page, SORT_ORDER
        )
    }

    async fn fetch_page(&self, query: &str, page: u32, generation: u64) -> Result<()> {
        let url = self.request_url(query, page);
        debug!(page, "Fetching search page");

        let request = HttpRequest::get(url).timeout(self.settings.request_timeout);

        let outcome = match self.http.execute(request).await {
            Ok(response) if response.is_success() => {
                match serde_json::from_slice::<SearchEnvelope>(&response.body) {
                    Ok(envelope) => Ok(envelope),
                    Err(e) => Err(ArchiveError::InvalidResponse(format!(
                        "search page could not be decoded: {}",
                        e
                    ))),
                }
            }
            Ok(response) => Err(ArchiveError::Network(format!(
                "search request failed with status {}",
                response.status
            ))),
            Err(e) => Err(ArchiveError::Network(e.to_string())),
        };

        match outcome {
            Ok(envelope) => {
                self.apply_page(envelope, page, generation);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Search page failed");
                let mut state = self.state.write();
                if self.generation.load(Ordering::SeqCst) == generation {
                    // Accumulated results survive a failed page.
                    state.error = Some(e.to_string());
                    state.clear_loading();
                }
                Err(e)
            }
        }
    }

    fn apply_page(&self, envelope: SearchEnvelope, page: u32, generation: u64) {
        let mut state = self.state.write();

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale search response");
            return;
        }

        let docs = envelope.response.docs;
        let returned = docs.len();

        let mut fresh = 0usize;
        for doc in docs {
            let item = doc.into_item();
            if state.seen.insert(item.identifier.clone()) {
                state.items.push(item);
                fresh += 1;
            }
        }

        state.page = page;
        state.has_more = returned >= self.settings.page_size;
        state.error = None;
        state.clear_loading();

        info!(
            page,
            returned,
            fresh,
            total = state.items.len(),
            has_more = state.has_more,
            "Applied search page"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::HttpResponse;
    use bridge_traits::BridgeError;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Scripted HTTP client: pops one canned response per request and counts
    /// calls.
    struct ScriptedHttp {
        responses: parking_lot::Mutex<Vec<BridgeResult<HttpResponse>>>,
        calls: AtomicUsize,
    }

    impl ScriptedHttp {
        fn new(responses: Vec<BridgeResult<HttpResponse>>) -> Self {
            Self {
                responses: parking_lot::Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(BridgeError::OperationFailed("no scripted response".into()));
            }
            responses.remove(0)
        }

        async fn download_stream(
            &self,
            _url: String,
        ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
            unimplemented!()
        }
    }

    /// Like [`ScriptedHttp`], but requests from `gate_after` onwards block
    /// until the test releases them, so in-flight overlap can be exercised.
    struct GatedHttp {
        responses: parking_lot::Mutex<Vec<BridgeResult<HttpResponse>>>,
        gate: tokio::sync::Semaphore,
        gate_after: usize,
        calls: AtomicUsize,
    }

    impl GatedHttp {
        fn new(responses: Vec<BridgeResult<HttpResponse>>, gate_after: usize) -> Self {
            Self {
                responses: parking_lot::Mutex::new(responses),
                gate: tokio::sync::Semaphore::new(0),
                gate_after,
                calls: AtomicUsize::new(0),
            }
        }

        fn release(&self) {
            self.gate.add_permits(1);
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn wait_for_calls(&self, n: usize) {
            for _ in 0..200 {
                if self.call_count() >= n {
                    return;
                }
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            }
            panic!("request {} never started", n);
        }
    }

    #[async_trait]
    impl HttpClient for GatedHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if index >= self.gate_after {
                self.gate.acquire().await.unwrap().forget();
            }
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(BridgeError::OperationFailed("no scripted response".into()));
            }
            responses.remove(0)
        }

        async fn download_stream(
            &self,
            _url: String,
        ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
            unimplemented!()
        }
    }

    fn page_response(ids: &[&str]) -> BridgeResult<HttpResponse> {
        let docs: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"identifier": "{}", "title": "T {}", "mediatype": "audio"}}"#,
                    id, id
                )
            })
            .collect();
        let body = format!(r#"{{"response": {{"docs": [{}]}}}}"#, docs.join(","));

        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body),
        })
    }

    fn ids(count: usize, offset: usize) -> Vec<String> {
        (0..count).map(|i| format!("item{:03}", offset + i)).collect()
    }

    fn small_settings(page_size: usize) -> ArchiveSettings {
        ArchiveSettings {
            page_size,
            ..ArchiveSettings::default()
        }
    }

    fn client_with(
        responses: Vec<BridgeResult<HttpResponse>>,
        page_size: usize,
    ) -> (ArchiveSearchClient, Arc<ScriptedHttp>) {
        let http = Arc::new(ScriptedHttp::new(responses));
        let client = ArchiveSearchClient::new(http.clone(), small_settings(page_size));
        (client, http)
    }

    #[tokio::test]
    async fn fresh_search_populates_session() {
        let (client, _) = client_with(vec![page_response(&["a", "b"])], 50);

        client
            .search("jazz", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.page, 1);
        assert!(!snap.has_more); // 2 < page size
        assert!(!snap.is_loading);
        assert!(!snap.is_loading_more);
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn has_more_tracks_page_size_boundary() {
        let full: Vec<String> = ids(50, 0);
        let full_refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let short: Vec<String> = ids(12, 50);
        let short_refs: Vec<&str> = short.iter().map(String::as_str).collect();

        let (client, _) =
            client_with(vec![page_response(&full_refs), page_response(&short_refs)], 50);

        client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();
        assert!(client.snapshot().has_more);

        client.load_more().await.unwrap();
        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 62);
        assert_eq!(snap.page, 2);
        assert!(!snap.has_more);
    }

    #[tokio::test]
    async fn append_dedupes_on_identifier() {
        let first: Vec<String> = ids(50, 0);
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();
        // Second page overlaps the first by ten items.
        let second: Vec<String> = ids(50, 40);
        let second_refs: Vec<&str> = second.iter().map(String::as_str).collect();

        let (client, _) =
            client_with(vec![page_response(&first_refs), page_response(&second_refs)], 50);

        client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();
        client.load_more().await.unwrap();

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 90);

        let unique: HashSet<&str> = snap.items.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(unique.len(), snap.items.len());
        // Arrival order preserved: first page first, then only-unseen tail.
        assert_eq!(snap.items[0].identifier, "item000");
        assert_eq!(snap.items[89].identifier, "item089");
    }

    #[tokio::test]
    async fn load_more_is_noop_when_exhausted() {
        let (client, http) = client_with(vec![page_response(&["only"])], 50);

        client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();
        assert_eq!(http.call_count(), 1);
        assert!(!client.snapshot().has_more);

        client.load_more().await.unwrap();
        client.load_more().await.unwrap();
        assert_eq!(http.call_count(), 1); // zero further network calls
    }

    #[tokio::test]
    async fn load_more_is_noop_while_fresh_search_is_in_flight() {
        let full: Vec<String> = ids(50, 0);
        let full_refs: Vec<&str> = full.iter().map(String::as_str).collect();

        let http = Arc::new(GatedHttp::new(vec![page_response(&full_refs)], 0));
        let client = Arc::new(ArchiveSearchClient::new(http.clone(), small_settings(50)));

        let searching = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .search("jazz", MediaKind::Audio, MediaCategory::Music, false)
                    .await
            })
        };
        http.wait_for_calls(1).await;

        // The fresh search is still in flight; an append must not start.
        client.load_more().await.unwrap();

        let snap = client.snapshot();
        assert!(snap.is_loading);
        assert!(!snap.is_loading_more);
        assert_eq!(http.call_count(), 1);

        http.release();
        searching.await.unwrap().unwrap();

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 50);
        assert!(!snap.is_loading);
        assert!(!snap.is_loading_more);
    }

    #[tokio::test]
    async fn concurrent_load_more_issues_a_single_network_call() {
        let first: Vec<String> = ids(50, 0);
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();
        let second: Vec<String> = ids(10, 50);
        let second_refs: Vec<&str> = second.iter().map(String::as_str).collect();

        // First page answers immediately; the append request is gated.
        let http = Arc::new(GatedHttp::new(
            vec![page_response(&first_refs), page_response(&second_refs)],
            1,
        ));
        let client = Arc::new(ArchiveSearchClient::new(http.clone(), small_settings(50)));

        client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();

        let appending = {
            let client = client.clone();
            tokio::spawn(async move { client.load_more().await })
        };
        http.wait_for_calls(2).await;
        assert!(client.snapshot().is_loading_more);

        client.load_more().await.unwrap();
        assert_eq!(http.call_count(), 2); // the racing append never fired

        http.release();
        appending.await.unwrap().unwrap();

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 60);
        assert!(!snap.is_loading_more);
    }

    #[tokio::test]
    async fn load_more_without_prior_search_is_noop() {
        let (client, http) = client_with(vec![], 50);
        client.load_more().await.unwrap();
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn local_only_category_issues_no_network_call() {
        let (client, http) = client_with(vec![], 50);

        client
            .search("my diary", MediaKind::Texts, MediaCategory::Journal, false)
            .await
            .unwrap();

        assert_eq!(http.call_count(), 0);
        let snap = client.snapshot();
        assert!(snap.items.is_empty());
        assert!(!snap.has_more);
    }

    #[tokio::test]
    async fn failed_page_preserves_accumulated_results() {
        let full: Vec<String> = ids(50, 0);
        let full_refs: Vec<&str> = full.iter().map(String::as_str).collect();

        let (client, _) = client_with(
            vec![
                page_response(&full_refs),
                Err(BridgeError::OperationFailed("connection reset".into())),
            ],
            50,
        );

        client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();
        let err = client.load_more().await.unwrap_err();
        assert!(matches!(err, ArchiveError::Network(_)));

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 50); // prior results survive
        assert_eq!(snap.page, 1); // page counter untouched by the failure
        assert!(snap.error.is_some());
        assert!(!snap.is_loading);
        assert!(!snap.is_loading_more);
    }

    #[tokio::test]
    async fn undecodable_page_surfaces_invalid_response() {
        let (client, _) = client_with(
            vec![Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from("<html>not json</html>"),
            })],
            50,
        );

        let err = client
            .search("x", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ArchiveError::InvalidResponse(_)));
        assert!(client.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn request_url_carries_paging_and_fields() {
        let (client, _) = client_with(vec![], 50);
        let url = client.request_url("mediatype:(audio)", 3);

        assert!(url.contains("rows=50"));
        assert!(url.contains("page=3"));
        assert!(url.contains("output=json"));
        assert!(url.contains("sort[]=downloads desc"));
        assert!(url.contains("fl[]=identifier"));
        assert!(url.contains("fl[]=mediatype"));
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_new_session() {
        // Simulate the race by applying a page whose generation predates a
        // newer reset.
        let (client, _) = client_with(vec![page_response(&["new"])], 50);

        client
            .search("fresh", MediaKind::Audio, MediaCategory::Music, false)
            .await
            .unwrap();

        let stale_generation = client.generation.load(Ordering::SeqCst) - 1;
        let envelope: SearchEnvelope = serde_json::from_str(
            r#"{"response": {"docs": [{"identifier": "stale", "mediatype": "audio"}]}}"#,
        )
        .unwrap();
        client.apply_page(envelope, 1, stale_generation);

        let snap = client.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].identifier, "new");
    }
}
