//! # Blogicum Core
//!
//! The domain layer of the blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the public visibility filter, the ownership policy and pagination.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod visibility;

pub use error::DomainError;
pub use pagination::{Page, PageRequest};
pub use visibility::{PostQuery, Visibility};
