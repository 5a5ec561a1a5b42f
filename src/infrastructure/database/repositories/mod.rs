//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod community_repository;
pub mod parking_spot_repository;
pub mod repository_provider;
pub mod resident_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, DbErr, RuntimeErr, SqlErr};

use crate::domain::DomainError;

/// Case-insensitive substring match on a text column.
pub(crate) fn contains_ignore_case<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Map a unique-index violation to `AlreadyExists`, anything else to `Storage`.
pub(crate) fn insert_err(e: DbErr, conflict: impl FnOnce() -> String) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyExists(conflict()),
        _ => db_err(e),
    }
}

/// True when `e` is a lock or serialization failure raised because another
/// transaction won a write race: SQLite `BUSY`/`LOCKED` (any extended code),
/// PostgreSQL `40001`/`40P01`.
pub(crate) fn is_contention(e: &DbErr) -> bool {
    let runtime = match e {
        DbErr::Conn(r) | DbErr::Exec(r) | DbErr::Query(r) => r,
        _ => return false,
    };
    let RuntimeErr::SqlxError(err) = runtime else {
        return false;
    };
    let Some(code) = err.as_database_error().and_then(|db| db.code()) else {
        return false;
    };
    match code.as_ref() {
        "40001" | "40P01" => true,
        other => other
            .parse::<i32>()
            .map(|c| matches!(c & 0xff, 5 | 6))
            .unwrap_or(false),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, run_migrations, DatabaseConfig};

    /// Fresh migrated in-memory SQLite database. A single pooled connection
    /// keeps every query on the same memory database.
    pub async fn memory_db() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    /// Migrated SQLite database in a fresh temp file, with a real pool.
    /// Remove the returned path when done.
    pub async fn file_db(max_connections: u32) -> (DatabaseConnection, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("parking-{}.db", uuid::Uuid::new_v4()));
        let mut config = DatabaseConfig::sqlite(&path.to_string_lossy());
        config.max_connections = max_connections;
        let db = init_database(&config).await.unwrap();
        run_migrations(&db).await.unwrap();
        (db, path)
    }

    pub async fn remove_file_db(db: DatabaseConnection, path: std::path::PathBuf) {
        db.close().await.unwrap();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
