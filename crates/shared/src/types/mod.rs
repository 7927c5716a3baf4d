//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

#[cfg(test)]
mod id_tests;

pub use id::*;
pub use money::Money;
pub use pagination::{PageMeta, PageRequest, PageResponse};
