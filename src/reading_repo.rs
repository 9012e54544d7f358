// SQLite consumption table: one row per meter sample, ascending id == ascending time.
// `time` is stored as 'YYYY-MM-DD HH:MM:SS' text so string comparison orders correctly.
// The report path only reads; save_readings exists for seeding and imports.

use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::error::ReportResult;
use crate::models::{NewReading, Reading, TimeWindow, WindowAggregates};

pub const STORAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn to_storage_time(t: &NaiveDateTime) -> String {
    t.format(STORAGE_TIME_FORMAT).to_string()
}

fn from_storage_time(s: &str) -> Result<NaiveDateTime, sqlx::Error> {
    NaiveDateTime::parse_from_str(s, STORAGE_TIME_FORMAT)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub struct ReadingRepo {
    pool: SqlitePool,
}

impl ReadingRepo {
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS consumption (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                time TEXT NOT NULL,
                power REAL NOT NULL,
                temp REAL NOT NULL,
                joules REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_consumption_time ON consumption(time)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self, readings), fields(repo = "readings", operation = "save_readings", readings_count = readings.len()))]
    pub async fn save_readings(&self, readings: &[NewReading]) -> ReportResult<()> {
        if readings.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for r in readings {
            sqlx::query(
                "INSERT INTO consumption (time, power, temp, joules) VALUES ($1, $2, $3, $4)",
            )
            .bind(to_storage_time(&r.time))
            .bind(r.power)
            .bind(r.temp)
            .bind(r.joules)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// AVG(power), AVG(temp), SUM(joules) over valid rows (joules > 0) in the window, plus the
    /// total row count so an empty window can be told apart from one with no valid rows.
    #[instrument(skip(self), fields(repo = "readings", operation = "window_aggregates"))]
    pub async fn window_aggregates(&self, window: &TimeWindow) -> ReportResult<WindowAggregates> {
        let row = sqlx::query(
            "SELECT AVG(CASE WHEN joules > 0 THEN power END) AS avg_power,
                    AVG(CASE WHEN joules > 0 THEN temp END) AS avg_temp,
                    SUM(CASE WHEN joules > 0 THEN joules END) AS total_joules,
                    COUNT(CASE WHEN joules > 0 THEN 1 END) AS valid_rows,
                    COUNT(*) AS total_rows
             FROM consumption
             WHERE time >= $1 AND time <= $2",
        )
        .bind(to_storage_time(&window.from()))
        .bind(to_storage_time(&window.to()))
        .fetch_one(&self.pool)
        .await?;

        Ok(WindowAggregates {
            avg_power: row.try_get("avg_power")?,
            avg_temp: row.try_get("avg_temp")?,
            total_energy_joules: row.try_get("total_joules")?,
            row_count: row.try_get("total_rows")?,
            valid_row_count: row.try_get("valid_rows")?,
        })
    }

    /// Every row in the window, ascending by id.
    #[instrument(skip(self), fields(repo = "readings", operation = "readings_in_window"))]
    pub async fn readings_in_window(&self, window: &TimeWindow) -> ReportResult<Vec<Reading>> {
        let rows = sqlx::query(
            "SELECT id, time, power, temp, joules FROM consumption
             WHERE time >= $1 AND time <= $2 ORDER BY id ASC",
        )
        .bind(to_storage_time(&window.from()))
        .bind(to_storage_time(&window.to()))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_reading_row(&row)?);
        }
        Ok(out)
    }

    /// Most recently stored row, regardless of any window.
    #[instrument(skip(self), fields(repo = "readings", operation = "latest_reading"))]
    pub async fn latest_reading(&self) -> ReportResult<Option<Reading>> {
        let row = sqlx::query(
            "SELECT id, time, power, temp, joules FROM consumption ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Self::parse_reading_row(&row)?))
    }

    fn parse_reading_row(row: &SqliteRow) -> Result<Reading, sqlx::Error> {
        let time: String = row.try_get("time")?;
        Ok(Reading {
            id: row.try_get("id")?,
            time: from_storage_time(&time)?,
            power: row.try_get("power")?,
            temp: row.try_get("temp")?,
            joules: row.try_get("joules")?,
        })
    }
}
