//! # custody-database
//!
//! PostgreSQL connection management, migrations, concrete repository
//! implementations, and the ownership transactor for CustodyTrack.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod transactor;

pub use connection::DatabasePool;
pub use transactor::PgOwnershipTransactor;
