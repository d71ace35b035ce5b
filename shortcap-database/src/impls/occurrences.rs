use anyhow::Context as _;

use crate::database::{Database, StoreBackend};
use crate::model::occurrence::Occurrence;

struct PairBinds {
    guild_id: i64,
    user_id: i64,
    at: i64,
}

fn pair_binds(guild_id: u64, user_id: u64, at: u64) -> anyhow::Result<PairBinds> {
    Ok(PairBinds {
        guild_id: i64::try_from(guild_id).context("guild_id out of i64 range")?,
        user_id: i64::try_from(user_id).context("user_id out of i64 range")?,
        at: i64::try_from(at).context("timestamp out of i64 range")?,
    })
}

/// Append one occurrence for the pair.
pub async fn record_occurrence(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    posted_at: u64,
) -> anyhow::Result<()> {
    match db.backend() {
        StoreBackend::Memory(store) => {
            store
                .insert(Occurrence {
                    guild_id,
                    user_id,
                    posted_at,
                })
                .await
        }
        StoreBackend::Postgres(pool) => {
            let key = pair_binds(guild_id, user_id, posted_at)?;

            sqlx::query(
                "INSERT INTO shorts_posts (guild_id, user_id, posted_at) VALUES ($1, $2, $3)",
            )
            .bind(key.guild_id)
            .bind(key.user_id)
            .bind(key.at)
            .execute(pool)
            .await?;

            Ok(())
        }
    }
}

/// Count occurrences for the pair with `posted_at >= cutoff`.
pub async fn count_occurrences_since(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    cutoff: u64,
) -> anyhow::Result<u64> {
    match db.backend() {
        StoreBackend::Memory(store) => store.count_since(guild_id, user_id, cutoff).await,
        StoreBackend::Postgres(pool) => {
            let key = pair_binds(guild_id, user_id, cutoff)?;

            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*)
                 FROM shorts_posts
                 WHERE guild_id = $1 AND user_id = $2 AND posted_at >= $3",
            )
            .bind(key.guild_id)
            .bind(key.user_id)
            .bind(key.at)
            .fetch_one(pool)
            .await?;

            u64::try_from(count).context("occurrence count out of u64 range")
        }
    }
}

/// Most recent `posted_at` for the pair at or after `cutoff`.
pub async fn latest_occurrence_since(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    cutoff: u64,
) -> anyhow::Result<Option<u64>> {
    match db.backend() {
        StoreBackend::Memory(store) => store.latest_since(guild_id, user_id, cutoff).await,
        StoreBackend::Postgres(pool) => {
            let key = pair_binds(guild_id, user_id, cutoff)?;

            let latest: Option<i64> = sqlx::query_scalar(
                "SELECT MAX(posted_at)
                 FROM shorts_posts
                 WHERE guild_id = $1 AND user_id = $2 AND posted_at >= $3",
            )
            .bind(key.guild_id)
            .bind(key.user_id)
            .bind(key.at)
            .fetch_one(pool)
            .await?;

            latest
                .map(|value| u64::try_from(value).context("posted_at row out of u64 range"))
                .transpose()
        }
    }
}

/// Remove occurrences for the pair with `posted_at >= cutoff`. Returns rows removed.
pub async fn delete_occurrences_since(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    cutoff: u64,
) -> anyhow::Result<u64> {
    match db.backend() {
        StoreBackend::Memory(store) => store.delete_since(guild_id, user_id, cutoff).await,
        StoreBackend::Postgres(pool) => {
            let key = pair_binds(guild_id, user_id, cutoff)?;

            let deleted = sqlx::query(
                "DELETE FROM shorts_posts WHERE guild_id = $1 AND user_id = $2 AND posted_at >= $3",
            )
            .bind(key.guild_id)
            .bind(key.user_id)
            .bind(key.at)
            .execute(pool)
            .await?
            .rows_affected();

            Ok(deleted)
        }
    }
}


#[cfg(test)]
mod postgres_tests {
    use sqlx::PgPool;

    use super::{
        count_occurrences_since, delete_occurrences_since, latest_occurrence_since,
        record_occurrence,
    };
    use crate::database::Database;
    use crate::quota::{DEFAULT_WINDOW, Decision, QuotaEngine};

    const GUILD: u64 = 10;
    const USER: u64 = 20;

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn window_queries_use_inclusive_cutoff(pool: PgPool) -> anyhow::Result<()> {
        let db = Database::new(pool);
        for posted_at in [100, 200, 300, 300, 400] {
            record_occurrence(&db, GUILD, USER, posted_at).await?;
        }
        record_occurrence(&db, GUILD, USER + 1, 300).await?;

        assert_eq!(count_occurrences_since(&db, GUILD, USER, 300).await?, 3);
        assert_eq!(count_occurrences_since(&db, GUILD, USER, 401).await?, 0);
        assert_eq!(latest_occurrence_since(&db, GUILD, USER, 0).await?, Some(400));
        assert_eq!(latest_occurrence_since(&db, GUILD, USER, 401).await?, None);

        assert_eq!(delete_occurrences_since(&db, GUILD, USER, 300).await?, 3);
        assert_eq!(delete_occurrences_since(&db, GUILD, USER, 300).await?, 0);
        assert_eq!(count_occurrences_since(&db, GUILD, USER, 0).await?, 2);
        assert_eq!(count_occurrences_since(&db, GUILD, USER + 1, 0).await?, 1);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn engine_blocks_second_post_on_postgres(pool: PgPool) -> anyhow::Result<()> {
        let engine = QuotaEngine::new(Database::new(pool), DEFAULT_WINDOW);
        let now = 1_700_000_000;

        assert_eq!(engine.evaluate_and_commit(GUILD, USER, now).await?, Decision::Allow);
        assert_eq!(engine.evaluate_and_commit(GUILD, USER, now + 60).await?, Decision::Block);
        assert_eq!(engine.stats(GUILD, USER, now + 60).await?.count, 1);
        assert_eq!(engine.reset(GUILD, USER, now + 60).await?, 1);
        assert_eq!(engine.evaluate_and_commit(GUILD, USER, now + 61).await?, Decision::Allow);
        Ok(())
    }
}
