//! Typed errors for HTML extraction.
//!
//! A parse error on a listing or product page signals a page-layout
//! mismatch that needs manual attention; the orchestrator wraps it with the
//! offending URL and aborts the run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("hit count indicator not found on results page")]
    HitCountMissing,

    #[error("hit count text {text:?} does not match the expected format")]
    HitCountFormat { text: String },

    #[error("no result nodes found on listing page")]
    NoResultNodes,

    #[error("required field '{field}' not found")]
    RequiredFieldMissing { field: &'static str },

    #[error("price text {value:?} is not a number")]
    InvalidPrice { value: String },

    #[error("failed to resolve product link {href:?}: {reason}")]
    LinkResolutionFailed { href: String, reason: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
