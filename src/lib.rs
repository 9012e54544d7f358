// Library for tests to access modules

pub mod config;
pub mod error;
pub mod models;
pub mod range;
pub mod reading_repo;
pub mod report;
pub mod routes;
pub mod series;
pub mod version;
