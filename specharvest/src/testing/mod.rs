//! Testing utilities for crawler code.
//!
//! This module provides:
//! - Listing-page HTML fixtures
//! - A scripted page source and failing collaborators
//! - Assertions over reports and emitted documents

mod assertions;
pub mod fixtures;
mod mocks;

pub use assertions::{
    assert_emitted_links, assert_none_before, assert_stopped_with, assert_unique_links,
};
pub use fixtures::{ListingFixture, NextFixture, RowFixture};
pub use mocks::{FailingIndex, FailingSink, ScriptedPageSource};
