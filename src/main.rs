use std::sync::Arc;
use std::time::Duration;

use env_logger::{Builder, Env};
use log::LevelFilter;

use forumscraper::core::SpiderConfig;
use forumscraper::scrapers::HttpScraper;
use forumscraper::spiders::ptt_digit::ForumSpider;
use forumscraper::{Crawler, DiskStorage, Spider};

/// Quiet defaults for the HTML parser crates; whatever `env` carries is applied on top.
fn log_builder(env: Env) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("selectors", LevelFilter::Warn)
        .filter_module("html5ever", LevelFilter::Error)
        .parse_env(env);
    builder
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log_builder(Env::default()).init();

    let spider_config = SpiderConfig::default()
        .with_depth(2)
        .with_concurrency(16)
        .with_headers(vec![("Accept-Language", "zh-TW,zh;q=0.9,en;q=0.8")]);

    let storage = DiskStorage::new("data")?.with_subfolder("posts");
    let spider = ForumSpider::new(Arc::new(storage))?.with_config(spider_config);

    let scraper = HttpScraper::new()?.with_timeout(Duration::from_secs(20))?;
    let crawler = Crawler::new(Box::new(scraper));
    crawler.run(spider).await?;

    Ok(())
}
