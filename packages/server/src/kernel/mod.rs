//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod http_fetcher;
pub mod llm;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use http_fetcher::{HttpFetcher, BROWSER_USER_AGENT};
pub use llm::LlmAI;
pub use test_dependencies::{
    MockAI, MockPageFetcher, TestDependencies, TEST_JWT_ISSUER, TEST_JWT_SECRET,
};
pub use traits::*;
