use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::warn;

use super::{CatalogClient, ProductPage};

/// Message shown when a list fetch fails, regardless of the cause.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading products";

const DEFAULT_PAGE_SIZE: i64 = 6;
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search: String,
    pub category: String,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListViewState {
    Idle,
    Loading,
    Loaded(ProductPage),
    Failed(String),
}

struct Inner {
    filters: ListFilters,
    page: i64,
    limit: i64,
    // Fetches are numbered; a response may only land if nothing newer has.
    next_seq: u64,
    last_applied: u64,
    pending: Option<JoinHandle<()>>,
}

/// Drives the product list: holds the current filters and page, fetches pages
/// through a [`CatalogClient`], and publishes state over a watch channel.
///
/// Filter edits reset the page to 1 and refresh after a debounce window so
/// rapid typing coalesces into one request. Page changes refresh immediately.
/// Each fetch carries a sequence number; a response is discarded when a
/// later-numbered one has already been applied, so a slow early request can
/// never overwrite fresher results.
#[derive(Clone)]
pub struct ListView {
    client: CatalogClient,
    inner: Arc<Mutex<Inner>>,
    state_tx: watch::Sender<ListViewState>,
    debounce: Duration,
}

impl ListView {
    pub fn new(client: CatalogClient) -> Self {
        Self::with_settings(client, DEFAULT_PAGE_SIZE, DEFAULT_DEBOUNCE)
    }

    pub fn with_settings(client: CatalogClient, limit: i64, debounce: Duration) -> Self {
        let (state_tx, _state_rx) = watch::channel(ListViewState::Idle);
        Self {
            client,
            inner: Arc::new(Mutex::new(Inner {
                filters: ListFilters::default(),
                page: 1,
                limit,
                next_seq: 0,
                last_applied: 0,
                pending: None,
            })),
            state_tx,
            debounce,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> ListViewState {
        self.state_tx.borrow().clone()
    }

    pub async fn filters(&self) -> ListFilters {
        self.inner.lock().await.filters.clone()
    }

    pub async fn page(&self) -> i64 {
        self.inner.lock().await.page
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.edit_filters(|filters| filters.search = search).await;
    }

    pub async fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.edit_filters(|filters| filters.category = category)
            .await;
    }

    pub async fn set_price_range(&self, min: Option<i64>, max: Option<i64>) {
        self.edit_filters(|filters| {
            filters.min_price = min;
            filters.max_price = max;
        })
        .await;
    }

    /// Jumps to a page and refreshes right away. Out-of-range targets are
    /// ignored when the current page count is known.
    pub async fn set_page(&self, page: i64) {
        if page < 1 {
            return;
        }
        if let ListViewState::Loaded(current) = self.state() {
            if current.total_pages > 0 && page as u64 > current.total_pages {
                return;
            }
        }
        {
            let mut inner = self.inner.lock().await;
            inner.page = page;
            if let Some(handle) = inner.pending.take() {
                handle.abort();
            }
        }
        self.refresh().await;
    }

    /// Fetches the current page and publishes the result, unless a newer
    /// fetch has already landed.
    pub async fn refresh(&self) {
        let (seq, page, limit, filters) = {
            let mut inner = self.inner.lock().await;
            inner.next_seq += 1;
            (inner.next_seq, inner.page, inner.limit, inner.filters.clone())
        };
        self.state_tx.send_replace(ListViewState::Loading);

        let result = self.client.list(page, limit, &filters).await;

        let mut inner = self.inner.lock().await;
        if seq <= inner.last_applied {
            return;
        }
        inner.last_applied = seq;
        match result {
            Ok(page) => {
                self.state_tx.send_replace(ListViewState::Loaded(page));
            }
            Err(err) => {
                warn!(error = %err, "product list fetch failed");
                self.state_tx
                    .send_replace(ListViewState::Failed(LOAD_ERROR_MESSAGE.to_string()));
            }
        }
    }

    async fn edit_filters(&self, apply: impl FnOnce(&mut ListFilters)) {
        let mut inner = self.inner.lock().await;
        apply(&mut inner.filters);
        inner.page = 1;
        if let Some(handle) = inner.pending.take() {
            handle.abort();
        }
        let view = self.clone();
        let debounce = self.debounce;
        inner.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            view.refresh().await;
        }));
    }
}
