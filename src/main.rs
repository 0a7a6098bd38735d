//! Call Ledger demo
//!
//! Stores a few values through the instrumented cache and prints their
//! retrieval, the call counter, the raw history and the replay. When a URL is
//! passed as the first argument it is also fetched twice through the page
//! cache.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use call_ledger::{Cache, Config, HttpFetcher, PageCache, RedisBackend, SharedBackend};

/// Runs the demo against the Redis server named by `REDIS_URL`.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis and create the cache (flushes the database)
/// 4. Store and read back one value of each kind
/// 5. Print the call counter, the raw history and the replay
/// 6. Optionally fetch a page twice through the page cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "call_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Configuration loaded: redis_url={}", config.redis_url);

    let backend: SharedBackend = Arc::new(
        RedisBackend::connect(&config.redis_url)
            .await
            .context("connecting to Redis")?,
    );
    let cache = Cache::new(backend.clone()).await?;

    println!("\n--- store() and get() ---");
    let key1 = cache.store(b"hello").await?;
    let key2 = cache.store("world").await?;
    let key3 = cache.store(123).await?;
    let key4 = cache.store(45.67).await?;

    let raw = cache.get(&key1).await?.unwrap_or_default();
    println!("Raw get (bytes): {}", String::from_utf8_lossy(&raw));
    println!("get_str(): {:?}", cache.get_str(&key2).await?);
    println!("get_int(): {:?}", cache.get_int(&key3).await?);
    let raw = cache.get(&key4).await?.unwrap_or_default();
    println!("Raw get (float): {}", String::from_utf8_lossy(&raw));

    println!("\n--- call counter ---");
    cache.store(b"first").await?;
    cache.store(b"second").await?;
    println!(
        "{} was called: {} times",
        cache.store_operation(),
        cache.call_count().await?
    );

    println!("\n--- call history ---");
    let id = cache.store_operation();
    println!("Stored inputs:");
    for input in backend.lrange(&id.inputs_key(), 0, -1).await? {
        println!("   {}", String::from_utf8_lossy(&input));
    }
    println!("Stored outputs:");
    for output in backend.lrange(&id.outputs_key(), 0, -1).await? {
        println!("   {}", String::from_utf8_lossy(&output));
    }

    println!("\n--- replay ---");
    println!("{}", cache.replay().await?);

    if let Some(url) = std::env::args().nth(1) {
        println!("\n--- page cache ---");
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        let pages = PageCache::new(backend.clone(), fetcher).with_ttl(config.page_ttl())?;

        for _ in 0..2 {
            let page = pages.get_page(&url).await?;
            println!("Fetched {} ({} bytes)", url, page.len());
        }
        println!("{} accessed {} times", url, pages.access_count(&url).await?);
    }

    Ok(())
}
