//! Network access for recitation audio
//!
//! - `Client`: a thin reqwest wrapper with timeouts and no retries
//! - `HttpWarmer`: the prefetch backend that pulls upcoming verses into caches
//! - `ApiVerseProvider`: verse lists from the alquran.cloud API

mod client;
mod error;
mod verses;
mod warmer;

pub use client::{Client, ClientConfig};
pub use error::{NetworkError, NetworkResult};
pub use warmer::HttpWarmer;
pub use verses::{ApiVerseProvider, DEFAULT_VERSE_API};
