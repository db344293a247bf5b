//! External collaborators of the research pipeline
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - Web search ([`WebSearchClient`], DuckDuckGo via daedra)
//!   and rank-based relevance scoring
//! - [`fetch`](crate::tools::fetch) - Raw page retrieval ([`PageFetcher`], reqwest)
//!
//! Both are traits so the pipeline can run against in-memory doubles:
//! ```ignore
//! let hits = DuckDuckGoSearch::new().search("rust programming", 5).await?;
//! for hit in hits {
//!     println!("{}: {}", hit.title, hit.url);
//! }
//! ```

/// Raw HTML fetching with timeout classification.
pub mod fetch;
/// Web search client and result scoring.
pub mod search;

pub use fetch::{FetchedPage, HttpPageFetcher, PageFetcher};
pub use search::{DuckDuckGoSearch, WebSearchClient};
