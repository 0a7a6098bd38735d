//! Web Module
//!
//! Expiring page cache in front of a remote fetch, with a per-URL access
//! counter.
//!
//! # Key layout
//! - `count:{url}` - access counter, never expires
//! - `cached:{url}` - page content, expires after the page TTL

mod fetcher;
mod page_cache;

pub use fetcher::{Fetcher, HttpFetcher};
pub use page_cache::{access_key, content_key, PageCache};
