//! Page extraction: listing HTML in, candidate records out.

mod fields;
mod html;
mod protocols;

pub use fields::{attribute_value, element_text, select_text, FieldOutcome};
pub use html::HtmlListingExtractor;
pub(crate) use html::compile_selector;
pub use protocols::ListingExtractor;
