use clap::Parser;
use std::env;

use ridi_search_rs::config::Opt;
use ridi_search_rs::query::SearchRequestParams;
use ridi_search_rs::searchapi::RidiSearchApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "native-tls-vendored")]
    openssl_probe::init_ssl_cert_env_vars();

    let opt = Opt::parse();
    if env::var("RUST_LOG").is_err() {
        if opt.debug {
            env::set_var("RUST_LOG", "debug");
        } else {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let api = RidiSearchApi::new(&opt.base_url);
    let params = SearchRequestParams {
        keyword: opt.keyword,
        category_id: opt.category_id,
        page: opt.page,
    };
    let result = api.search(&params).await?;
    log::debug!("collected {} book ids for the store", result.book_ids().len());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
