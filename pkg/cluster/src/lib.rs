pub mod client;
pub mod http;
pub mod memory;

pub use client::{ClusterError, SecretClient};
pub use http::HttpSecretClient;
pub use memory::MemorySecretClient;
