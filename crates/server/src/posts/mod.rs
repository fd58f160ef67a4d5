//! Post query engine.
//!
//! This module provides:
//! - PostFilter / PostPage: filter normalization and page arithmetic
//! - PostQueryBuilder: matched (count, data) statement pair with shared
//!   predicates and bound values
//! - PostService: execution against the pool and page assembly
//!
//! The count and data statements are two independent reads rather than one
//! transaction; writes landing between them can skew the total against the
//! returned window. Accepted for a read-mostly listing endpoint.

mod query_builder;
mod service;
mod types;

pub use query_builder::PostQueryBuilder;
pub use service::PostService;
pub use types::{PostFilter, PostPage};
