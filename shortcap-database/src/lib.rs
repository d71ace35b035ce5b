pub mod database;
pub mod impls;
pub mod memory_store;
pub mod model;
pub mod pair_locks;
pub mod quota;

pub use database::{Database, MIGRATOR};
pub use quota::{Decision, QuotaEngine, QuotaStats};
