use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Opt {
    /// Search keyword; a "출판사:" prefix switches to publisher search
    pub keyword: String,
    /// Category id filter, digits only (anything else is ignored)
    #[clap(short, long)]
    pub category_id: Option<String>,
    /// Result page, 24 books per page
    #[clap(short, long)]
    pub page: Option<String>,
    /// Search service base url
    #[clap(
        long,
        default_value = "https://search-api.ridibooks.com",
        env = "RIDI_SEARCH_API"
    )]
    pub base_url: String,
    #[clap(short, long)]
    pub debug: bool,
}
