//! User domain entities.

pub mod capability;
pub mod model;
pub mod role;
pub mod status;

pub use capability::Capability;
pub use model::User;
pub use role::UserRole;
pub use status::UserStatus;
