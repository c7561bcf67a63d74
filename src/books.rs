use moka::future::{Cache, CacheBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CACHE_SIZE: usize = 100;
const CACHE_TTL_SECS: u64 = 10 * 60;

/// Normalized book record as delivered by the book metadata service.
/// `title` stays optional so malformed records deserialize instead of
/// failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub b_id: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub title: Option<BookTitle>,
    #[serde(default)]
    pub series: Option<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookTitle {
    pub main: String,
    /// Volume/episode label rendered in front of the title, e.g. "2부".
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub property: SeriesProperty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesProperty {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request-scoped store of book records keyed by `b_id`. Records are read
/// during a render and refreshed by TTL, never mutated in place.
#[derive(Clone)]
pub struct BookStore {
    cache: Cache<String, Book>,
}

impl BookStore {
    pub fn new() -> BookStore {
        let cache = CacheBuilder::new(CACHE_SIZE)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();
        BookStore { cache }
    }

    pub async fn insert(&self, book: Book) {
        self.cache.insert(book.b_id.clone(), book).await;
    }

    pub async fn insert_all(&self, books: Vec<Book>) {
        for book in books {
            self.insert(book).await;
        }
    }

    pub fn get(&self, b_id: &str) -> Option<Book> {
        self.cache.get(&b_id.to_string())
    }
}

impl Default for BookStore {
    fn default() -> Self {
        BookStore::new()
    }
}
