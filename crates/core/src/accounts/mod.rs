//! Principal registration, login and lookup.

mod error;
mod service;
mod types;

pub use error::AccountError;
pub use service::{AccountService, validate_registration};
pub use types::{NewPrincipal, Principal, PrincipalSummary};
