//! Pagination control inspection and the HTTP page source.

mod control;
#[cfg(feature = "http")]
mod http;

pub use control::{NextControl, PaginationInspector};
#[cfg(feature = "http")]
pub use http::HttpPageSource;
