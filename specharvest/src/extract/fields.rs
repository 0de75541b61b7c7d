//! Per-field extraction outcomes.

use scraper::{ElementRef, Selector};

use crate::core::PLACEHOLDER;
use crate::errors::MissingField;

/// Result of looking up one field inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field was found and has non-blank text.
    Present(String),
    /// The element is missing or its text is blank.
    Absent,
}

impl FieldOutcome {
    /// Builds an outcome from optional raw text, treating blank text as
    /// absent.
    #[must_use]
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Self::Present(t),
            _ => Self::Absent,
        }
    }

    /// Whether the field was found.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The value of a required field.
    pub fn required(self, field: &'static str) -> Result<String, MissingField> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(MissingField::new(field)),
        }
    }

    /// The value of an optional field, or the blank placeholder.
    #[must_use]
    pub fn or_placeholder(self) -> String {
        match self {
            Self::Present(value) => value,
            Self::Absent => PLACEHOLDER.to_string(),
        }
    }
}

/// Whitespace-normalized text of the first match of `selector` in `row`.
#[must_use]
pub fn select_text(row: ElementRef<'_>, selector: &Selector) -> FieldOutcome {
    FieldOutcome::from_text(row.select(selector).next().map(element_text))
}

/// Trimmed value of `attribute` on the row element itself.
#[must_use]
pub fn attribute_value(row: ElementRef<'_>, attribute: &str) -> FieldOutcome {
    FieldOutcome::from_text(row.value().attr(attribute).map(|v| v.trim().to_string()))
}

/// Joins the text nodes of an element, collapsing runs of whitespace.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
