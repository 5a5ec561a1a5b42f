//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, ping, run_migrations, DatabaseConfig};
pub use storage::InMemoryStorage;
