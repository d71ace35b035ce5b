use sqlx::{PgPool, migrate::Migrator};

use crate::memory_store::MemoryStore;

/// Compile-time discovered SQLx migrations for the `shortcap-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Clone, Debug)]
pub(crate) enum StoreBackend {
    Postgres(PgPool),
    Memory(MemoryStore),
}

/// Shared database handle passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    backend: StoreBackend,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            backend: StoreBackend::Postgres(pool),
        }
    }

    /// Create a process-local handle. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory(MemoryStore::default()),
        }
    }

    pub(crate) fn backend(&self) -> &StoreBackend {
        &self.backend
    }
}
