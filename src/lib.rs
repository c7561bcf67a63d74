pub mod books;
pub mod config;
pub mod query;
pub mod searchapi;
pub mod title;

pub use books::{Book, BookStore, BookTitle, Series, SeriesProperty};
pub use query::{
    build_search_query, has_pagination, page_window, start_position, total_pages, PageWindow,
    SearchMode, SearchQuery, SearchRequestParams, PAGE_PER_ITEM,
};
pub use searchapi::{shape_search_payload, RidiSearchApi, SearchResult};
pub use title::{resolve_title, TitleError};
