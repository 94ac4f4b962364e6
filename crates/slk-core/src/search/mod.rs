//! Search query and result presentation.
//!
//! The pipeline for one invocation is strictly sequential:
//! options are validated, one request goes to the transport, and the
//! returned envelope is rendered through an [`Output`](crate::output::Output).

pub mod invoke;
pub mod model;
pub mod normalize;
pub mod options;
pub mod render;

pub use invoke::{RawOptions, SearchKind, SearchRequest, SearchTransport, run_search, search};
pub use model::{ChannelRef, FileMatch, MatchSet, MessageMatch, PagingInfo, SearchResult};
pub use normalize::{format_provider_timestamp, format_unix_seconds, truncate};
pub use options::{
    MAX_COUNT, MAX_PAGE, SearchOptions, SortBy, SortDirection, ValidationError, validate,
};
pub use render::render;
