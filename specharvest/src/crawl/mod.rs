//! The pagination walker and the capabilities it drives.

mod cursor;
mod integration_tests;
mod protocols;
mod restrictions;
mod walker;

pub use cursor::PageCursor;
pub use protocols::{DocumentSink, IdentityIndex, PageSource};
pub use restrictions::{RestrictionFilter, Verdict};
pub use walker::PaginationWalker;
