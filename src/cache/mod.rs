//! Cache Module
//!
//! Stores scalar values under generated keys with every store call recorded.

mod store;
mod value;


// Re-export public types
pub use store::{decode_int, decode_text, Cache, StoreValue, STORE_OPERATION};
pub use value::Value;
