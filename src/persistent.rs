use crate::error::ScrapeError;
use crate::legislatives::ResultRecord;
use chrono::{DateTime, FixedOffset};
use futures::TryStreamExt;
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use tracing::debug;

const RESULTS_TABLE: &str = "results";

/// SQLite sink for the final record set. A run replaces the previous set
/// wholesale; the natural key (area_id, candidate, nuances, tour) guards
/// against duplicate rows within a run.
pub struct Persistent {
    pool: SqlitePool,
}

impl Persistent {
    pub async fn new(filename: &str) -> Result<Persistent, ScrapeError> {
        let opt = SqliteConnectOptions::new()
            .filename(filename)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        Persistent::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Persistent, ScrapeError> {
        let p = Persistent { pool };
        if !p.is_table_exists().await? {
            p.create_table().await?;
        }
        Ok(p)
    }

    async fn is_table_exists(&self) -> Result<bool, ScrapeError> {
        Ok(
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(RESULTS_TABLE)
                .fetch_optional(&self.pool)
                .await?
                .is_some(),
        )
    }

    async fn create_table(&self) -> Result<(), ScrapeError> {
        let query = format!(
            r#"
                CREATE TABLE {} (
                    area_id TEXT NOT NULL,
                    dep_id TEXT NOT NULL,
                    cir_number INTEGER NOT NULL,
                    tour TEXT NOT NULL,
                    candidate TEXT,
                    nuances TEXT,
                    gender TEXT,
                    elected TEXT,
                    columns TEXT,
                    created_at DATETIME,
                    UNIQUE (area_id, candidate, nuances, tour)
                )
            "#,
            RESULTS_TABLE
        );
        sqlx::query(query.as_str()).execute(&self.pool).await?;
        debug!("Created {}", RESULTS_TABLE);
        Ok(())
    }

    /// Clear-then-insert inside one transaction, so a failed run never
    /// leaves a half-replaced set behind.
    pub async fn replace_all(&self, records: &[ResultRecord]) -> Result<(), ScrapeError> {
        let mut tx = self.pool.begin().await?;
        let query = format!("DELETE FROM {}", RESULTS_TABLE);
        sqlx::query(&query).execute(&mut tx).await?;

        let query = format!(
            r#"INSERT OR REPLACE INTO {} (
                area_id,
                dep_id,
                cir_number,
                tour,
                candidate,
                nuances,
                gender,
                elected,
                columns,
                created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            RESULTS_TABLE
        );
        for record in records {
            sqlx::query(&query)
                .bind(&record.area_id)
                .bind(&record.dep_id)
                .bind(record.cir_number)
                .bind(record.tour.as_str())
                .bind(record.candidate())
                .bind(record.nuances())
                .bind(record.gender.as_str())
                .bind(record.elected())
                .bind(serde_json::to_string(&record.columns)?)
                .bind(get_now())
                .execute(&mut tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u32, ScrapeError> {
        let query = format!("SELECT COUNT(*) FROM {}", RESULTS_TABLE);
        Ok(sqlx::query(&query)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?)
    }

    pub async fn get_area_ids(&self) -> Result<Vec<String>, ScrapeError> {
        let mut area_ids: Vec<String> = vec![];
        let query = format!(
            "SELECT DISTINCT area_id FROM {} ORDER BY area_id",
            RESULTS_TABLE
        );
        let mut rows = sqlx::query(&query).fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            area_ids.push(row.try_get("area_id")?);
        }

        Ok(area_ids)
    }
}

fn get_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(
        &chrono::offset::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legislatives::{Gender, Round, CANDIDATE_COL, ELECTED_COL, NUANCES_COL};
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::BTreeMap;

    fn record(candidate: &str, tour: Round, elected: &str) -> ResultRecord {
        let mut columns = BTreeMap::new();
        columns.insert(CANDIDATE_COL.to_string(), candidate.to_string());
        columns.insert(NUANCES_COL.to_string(), "REM".to_string());
        columns.insert(ELECTED_COL.to_string(), elected.to_string());
        ResultRecord {
            area_id: ResultRecord::area_id("075", 1),
            dep_id: "075".to_string(),
            cir_number: 1,
            tour,
            gender: Gender::from_candidate(candidate),
            columns,
        }
    }

    async fn in_memory() -> Persistent {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Connect failed");
        Persistent::with_pool(pool).await.expect("Setup failed")
    }

    #[tokio::test]
    async fn test_replace_all_is_idempotent() {
        let p = in_memory().await;
        let records = vec![
            record("Mme Alice MARTIN", Round::Second, "Oui"),
            record("M. Jean DUPONT", Round::Second, "Non"),
        ];

        p.replace_all(&records).await.expect("First run failed");
        p.replace_all(&records).await.expect("Second run failed");

        assert_eq!(p.count().await.expect("Count failed"), 2);
        assert_eq!(
            p.get_area_ids().await.expect("Read failed"),
            vec!["ref:075-01".to_string()]
        );
    }

    #[tokio::test]
    async fn test_replace_all_drops_the_previous_record_set() {
        let p = in_memory().await;
        p.replace_all(&[record("Mme Alice MARTIN", Round::First, "Oui")])
            .await
            .expect("First run failed");
        p.replace_all(&[record("M. Jean DUPONT", Round::First, "Oui")])
            .await
            .expect("Second run failed");

        assert_eq!(p.count().await.expect("Count failed"), 1);
    }
}
