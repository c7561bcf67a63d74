use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::query::{build_search_query, SearchMode, SearchRequestParams};

const UA: &str = "ridi-search-rs/0.1";
const RETRY_LIMIT: usize = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Client for the storefront search service.
#[derive(Clone)]
pub struct RidiSearchApi {
    client: reqwest::Client,
    base_url: String,
}

impl RidiSearchApi {
    pub fn new(base_url: &str) -> RidiSearchApi {
        let client = reqwest::Client::builder()
            .user_agent(UA)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();
        RidiSearchApi {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Run one search against the service and shape the payload into the
    /// `{ book, author }` envelope both search modes share.
    pub async fn search(&self, params: &SearchRequestParams) -> Result<SearchResult> {
        if params.keyword.is_empty() {
            return Ok(SearchResult::default());
        }

        let mode = SearchMode::from_keyword(&params.keyword);
        let query = build_search_query(params);
        let url = query.url(&self.base_url);
        let payload = self.get_json_with_retry(&url).await?;
        let result = shape_search_payload(mode, payload)?;
        log::debug!(
            "search {:?} matched {} books / {} authors",
            params.keyword,
            result.book.total,
            result.author.total
        );
        Ok(result)
    }

    async fn get_json_with_retry(&self, url: &str) -> Result<serde_json::Value> {
        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let res = match self.client.get(url).send().await {
                Ok(res) => res.error_for_status().map_err(anyhow::Error::from),
                Err(err) => Err(anyhow::Error::from(err)),
            };
            match res {
                Ok(res) => return Ok(res.json::<serde_json::Value>().await?),
                Err(err) if attempt < RETRY_LIMIT => {
                    log::warn!(
                        "search request failed on attempt {}/{} ({}), retrying in {:?}",
                        attempt,
                        RETRY_LIMIT,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => {
                    log::warn!(
                        "search request failed on final attempt {}/{}, giving up",
                        attempt,
                        RETRY_LIMIT
                    );
                    return Err(err);
                }
            }
        }
    }
}

/// Shape a raw search payload by mode. Publisher searches return the book
/// result alone; it is wrapped with an empty author result so callers see
/// one envelope.
pub fn shape_search_payload(mode: SearchMode, payload: serde_json::Value) -> Result<SearchResult> {
    match mode {
        SearchMode::Publisher => {
            let book: BookResult = serde_json::from_value(payload)?;
            Ok(SearchResult {
                book,
                author: AuthorResult::default(),
            })
        }
        SearchMode::General => Ok(serde_json::from_value(payload)?),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub book: BookResult,
    pub author: AuthorResult,
}

impl SearchResult {
    /// Every `b_id` in the book results, in result order. Feeds the
    /// normalized book store.
    pub fn book_ids(&self) -> Vec<String> {
        self.book
            .books
            .iter()
            .map(|item| item.b_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookResult {
    pub total: i64,
    pub books: Vec<SearchBookItem>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBookItem {
    pub b_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorResult {
    pub total: i64,
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Category bucket rendered as a filter tab above the book results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub category_id: i64,
    pub category_name: String,
    pub doc_count: i64,
}
