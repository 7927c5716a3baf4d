//! Request middleware.

pub mod session;

pub use session::{CurrentPrincipal, require_session, session_cookie};
