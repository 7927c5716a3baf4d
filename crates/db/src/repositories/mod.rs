//! Repository implementations of the core store traits.

mod organization;
mod policy;
mod user;
mod wallet;

pub use organization::OrganizationRepository;
pub use policy::PolicyRepository;
pub use user::UserRepository;
pub use wallet::WalletRepository;
