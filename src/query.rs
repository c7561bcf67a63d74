use lazy_static::*;
use regex::Regex;
use urlencoding::encode;

lazy_static! {
    static ref RE_NUMBER: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// Books shown per result page by the storefront.
pub const PAGE_PER_ITEM: i64 = 24;

const SEARCH_PATH: &str = "/search";
const SEARCH_SITE: &str = "ridi-store";
// "publisher:" marker typed into the storefront search box
const PUBLISHER_MARKER: &str = "출판사:";

/// Raw query-string inputs of a search page request.
#[derive(Debug, Clone, Default)]
pub struct SearchRequestParams {
    pub keyword: String,
    pub category_id: Option<String>,
    pub page: Option<String>,
}

/// The two mutually exclusive search modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    General,
    Publisher,
}

impl SearchMode {
    pub fn from_keyword(keyword: &str) -> SearchMode {
        if keyword.starts_with(PUBLISHER_MARKER) {
            SearchMode::Publisher
        } else {
            SearchMode::General
        }
    }
}

/// Outbound query descriptor: the `/search` path plus ordered `(key, value)`
/// pairs. Built descriptors hold each key at most once; the last write for a
/// key wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    path: &'static str,
    params: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> SearchQuery {
        SearchQuery {
            path: SEARCH_PATH,
            params: Vec::new(),
        }
    }

    /// Push a pair at the end without looking at existing keys.
    pub fn append(&mut self, key: &str, value: &str) {
        self.params.push((key.to_string(), value.to_string()));
    }

    /// Overwrite the value in place when the key exists, append otherwise.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|pair| pair.0 == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.append(key, value),
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }

    /// Render the pairs in insertion order, percent-encoding the values.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode(v)))
            .collect::<Vec<String>>()
            .join("&")
    }

    pub fn url(&self, base: &str) -> String {
        format!(
            "{}{}?{}",
            base.trim_end_matches('/'),
            self.path,
            self.to_query_string()
        )
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery::new()
    }
}

/// Map a page's raw query parameters onto the parameter set the search
/// backend expects. Pure; invalid optional inputs are dropped, never errors.
pub fn build_search_query(params: &SearchRequestParams) -> SearchQuery {
    let mut query = SearchQuery::new();
    query.append("site", SEARCH_SITE);
    query.append("where", "book");

    if let Some(category_id) = params.category_id.as_deref() {
        if RE_NUMBER.is_match(category_id) {
            query.delete("category_id");
            query.append("category_id", category_id);
        }
    }

    if let Some(page) = params.page.as_deref() {
        if RE_NUMBER.is_match(page) {
            // digit strings beyond i64, or pages whose start offset leaves
            // i64, are treated like non-numeric pages
            if let Some(start) = page.parse::<i64>().ok().and_then(start_position) {
                query.delete("page");
                query.delete("start");
                query.append("start", &start.to_string());
            }
        }
    }

    match SearchMode::from_keyword(&params.keyword) {
        SearchMode::Publisher => {
            query.append("what", "publisher");
            let keyword = params
                .keyword
                .strip_prefix(PUBLISHER_MARKER)
                .unwrap_or(&params.keyword);
            query.append("keyword", keyword);
        }
        SearchMode::General => {
            query.append("what", "base");
            query.set("where", "author");
            query.append("keyword", &params.keyword);
        }
    }

    query
}

/// First result index of a 1-based page, `None` when the offset does not
/// fit an i64.
pub fn start_position(page: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(PAGE_PER_ITEM)
}

pub fn total_pages(total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total - 1) / PAGE_PER_ITEM + 1
}

/// A pager is rendered only when more than one page exists and the current
/// page actually has results.
pub fn has_pagination(total: i64, shown: usize) -> bool {
    total > PAGE_PER_ITEM && shown > 0
}

/// Block of page numbers the pager shows around the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub start_page: i64,
    pub end_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Compute the pager block of `show_page_count` pages containing
/// `current_page`, clamped to the last page of the result set.
pub fn page_window(total: i64, current_page: i64, show_page_count: i64) -> PageWindow {
    let last = total_pages(total).max(1);
    let current = current_page.max(1).min(last);
    let show = show_page_count.max(1);
    let start_page = ((current - 1) / show) * show + 1;
    let end_page = start_page.saturating_add(show - 1).min(last);
    PageWindow {
        start_page,
        end_page,
        has_prev: start_page > 1,
        has_next: end_page < last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(keyword: &str) -> SearchRequestParams {
        SearchRequestParams {
            keyword: keyword.to_string(),
            category_id: None,
            page: None,
        }
    }

    fn count_key(query: &SearchQuery, key: &str) -> usize {
        query.pairs().iter().filter(|(k, _)| k == key).count()
    }

    #[test]
    fn general_mode_targets_books_and_authors() {
        let query = build_search_query(&params("미생"));

        assert_eq!(query.get("site"), Some("ridi-store"));
        assert_eq!(query.get("what"), Some("base"));
        assert_eq!(query.get("where"), Some("author"));
        assert_eq!(query.get("keyword"), Some("미생"));
    }

    #[test]
    fn general_mode_overwrites_where_in_place() {
        let query = build_search_query(&params("미생"));

        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["site", "where", "what", "keyword"]);
        assert_eq!(count_key(&query, "where"), 1);
    }

    #[test]
    fn publisher_mode_strips_marker_and_keeps_where() {
        let query = build_search_query(&params("출판사:문학동네"));

        assert_eq!(query.get("what"), Some("publisher"));
        assert_eq!(query.get("where"), Some("book"));
        assert_eq!(query.get("keyword"), Some("문학동네"));
    }

    #[test]
    fn publisher_marker_is_stripped_once() {
        let query = build_search_query(&params("출판사:출판사:리디"));

        assert_eq!(query.get("keyword"), Some("출판사:리디"));
    }

    #[test]
    fn empty_keyword_still_builds() {
        let query = build_search_query(&params(""));

        assert_eq!(query.get("what"), Some("base"));
        assert_eq!(query.get("where"), Some("author"));
        assert_eq!(query.get("keyword"), Some(""));
    }

    #[test]
    fn category_id_digits_are_forwarded() {
        let mut request = params("미생");
        request.category_id = Some("2200".to_string());

        let query = build_search_query(&request);

        assert_eq!(query.get("category_id"), Some("2200"));
        assert_eq!(count_key(&query, "category_id"), 1);
    }

    #[test]
    fn category_id_non_numeric_is_dropped() {
        for bad in ["", "12a", "로맨스", "-3", "1 2"] {
            let mut request = params("미생");
            request.category_id = Some(bad.to_string());

            let query = build_search_query(&request);

            assert_eq!(query.get("category_id"), None, "category_id {:?}", bad);
        }
    }

    #[test]
    fn page_maps_to_start_position() {
        for (page, start) in [("1", "0"), ("3", "48"), ("10", "216")] {
            let mut request = params("미생");
            request.page = Some(page.to_string());

            let query = build_search_query(&request);

            assert_eq!(query.get("start"), Some(start), "page {:?}", page);
            assert_eq!(query.get("page"), None);
        }
    }

    #[test]
    fn page_zero_follows_the_start_formula() {
        let mut request = params("미생");
        request.page = Some("0".to_string());

        let query = build_search_query(&request);

        assert_eq!(query.get("start"), Some("-24"));
    }

    #[test]
    fn page_too_large_for_a_start_offset_is_dropped() {
        let mut request = params("미생");
        request.page = Some(i64::MAX.to_string());

        let query = build_search_query(&request);

        assert_eq!(query.get("start"), None);
        assert_eq!(query.get("page"), None);
    }

    #[test]
    fn start_position_is_checked_at_the_i64_edge() {
        assert_eq!(start_position(1), Some(0));
        assert_eq!(start_position(0), Some(-24));
        assert_eq!(start_position(i64::MAX), None);
    }

    #[test]
    fn page_non_numeric_is_dropped() {
        for bad in ["", "one", "1a", "２", "99999999999999999999"] {
            let mut request = params("미생");
            request.page = Some(bad.to_string());

            let query = build_search_query(&request);

            assert_eq!(query.get("start"), None, "page {:?}", bad);
        }
    }

    #[test]
    fn set_keeps_a_single_entry_per_key() {
        let mut query = SearchQuery::new();
        query.append("what", "base");
        query.set("what", "publisher");

        assert_eq!(query.get("what"), Some("publisher"));
        assert_eq!(count_key(&query, "what"), 1);
    }

    #[test]
    fn delete_then_append_moves_key_to_the_end() {
        let mut query = SearchQuery::new();
        query.append("category_id", "100");
        query.append("keyword", "미생");
        query.delete("category_id");
        query.append("category_id", "2200");

        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["keyword", "category_id"]);
        assert_eq!(query.get("category_id"), Some("2200"));
    }

    #[test]
    fn query_string_is_ordered_and_encoded() {
        let query = build_search_query(&params("한국 소설"));

        let qs = query.to_query_string();
        assert!(qs.starts_with("site=ridi-store&where=author&what=base&"));
        assert!(qs.ends_with("keyword=%ED%95%9C%EA%B5%AD%20%EC%86%8C%EC%84%A4"));
    }

    #[test]
    fn url_joins_base_with_and_without_trailing_slash() {
        let query = build_search_query(&params("미생"));

        let plain = query.url("https://search-api.ridibooks.com");
        let slashed = query.url("https://search-api.ridibooks.com/");
        assert_eq!(plain, slashed);
        assert!(plain.starts_with("https://search-api.ridibooks.com/search?site=ridi-store"));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(24), 1);
        assert_eq!(total_pages(25), 2);
        assert_eq!(total_pages(147), 7);
    }

    #[test]
    fn total_pages_is_exact_for_huge_totals() {
        assert_eq!(total_pages(i64::MAX), i64::MAX / PAGE_PER_ITEM + 1);
        assert_eq!(total_pages(i64::MAX - 7), i64::MAX / PAGE_PER_ITEM);
    }

    #[test]
    fn has_pagination_requires_items_and_more_than_one_page() {
        assert!(has_pagination(147, 24));
        assert!(!has_pagination(24, 24));
        assert!(!has_pagination(147, 0));
    }

    #[test]
    fn page_window_first_block() {
        let window = page_window(147, 2, 10);

        assert_eq!(window.start_page, 1);
        assert_eq!(window.end_page, 7);
        assert!(!window.has_prev);
        assert!(!window.has_next);
    }

    #[test]
    fn page_window_clamps_to_last_page() {
        // 480 items -> 20 pages, tablet-sized block of 5
        let window = page_window(480, 18, 5);

        assert_eq!(window.start_page, 16);
        assert_eq!(window.end_page, 20);
        assert!(window.has_prev);
        assert!(!window.has_next);
    }

    #[test]
    fn page_window_middle_block_has_both_directions() {
        let window = page_window(480, 8, 5);

        assert_eq!(window.start_page, 6);
        assert_eq!(window.end_page, 10);
        assert!(window.has_prev);
        assert!(window.has_next);
    }

    #[test]
    fn page_window_survives_a_huge_block_size() {
        let window = page_window(147, 2, i64::MAX);

        assert_eq!(window.start_page, 1);
        assert_eq!(window.end_page, 7);
        assert!(!window.has_prev);
        assert!(!window.has_next);
    }
}
