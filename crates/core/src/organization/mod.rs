//! Organizations and their membership.

mod error;
mod service;
mod types;

pub use error::OrganizationError;
pub use service::OrganizationService;
pub use types::{Organization, OrganizationView};
