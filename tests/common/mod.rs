// Shared test helpers
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use currentcost::models::{NewReading, Reading};
use currentcost::reading_repo::ReadingRepo;
use tempfile::TempDir;

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn reading(id: i64, time: NaiveDateTime, power: f64, temp: f64, joules: f64) -> Reading {
    Reading {
        id,
        time,
        power,
        temp,
        joules: Some(joules),
    }
}

pub fn new_reading(time: NaiveDateTime, power: f64, temp: f64, joules: Option<f64>) -> NewReading {
    NewReading {
        time,
        power,
        temp,
        joules,
    }
}

/// Repo backed by a fresh SQLite file; keep the TempDir alive for the test's duration.
pub async fn temp_repo() -> (TempDir, ReadingRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("consumption.db");
    let repo = ReadingRepo::connect(path.to_str().unwrap(), 2).await.unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}
