use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::occurrence::Occurrence;

/// Process-local occurrence log kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<Occurrence>>>,
}

impl MemoryStore {
    pub async fn insert(&self, occurrence: Occurrence) -> anyhow::Result<()> {
        self.rows.write().await.push(occurrence);
        Ok(())
    }

    pub async fn count_since(&self, guild_id: u64, user_id: u64, cutoff: u64) -> anyhow::Result<u64> {
        let rows = self.rows.read().await;
        let count = rows
            .iter()
            .filter(|row| matches_pair_since(row, guild_id, user_id, cutoff))
            .count();

        Ok(count as u64)
    }

    pub async fn latest_since(
        &self,
        guild_id: u64,
        user_id: u64,
        cutoff: u64,
    ) -> anyhow::Result<Option<u64>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| matches_pair_since(row, guild_id, user_id, cutoff))
            .map(|row| row.posted_at)
            .max())
    }

    pub async fn delete_since(&self, guild_id: u64, user_id: u64, cutoff: u64) -> anyhow::Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !matches_pair_since(row, guild_id, user_id, cutoff));

        Ok((before - rows.len()) as u64)
    }
}

fn matches_pair_since(row: &Occurrence, guild_id: u64, user_id: u64, cutoff: u64) -> bool {
    row.guild_id == guild_id && row.user_id == user_id && row.posted_at >= cutoff
}
