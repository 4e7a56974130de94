#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Owner {
    pub login: String,
    pub id: u64,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub owner: Owner,
    pub stars: u32,
    #[serde(with = "jsonfetch::epoch_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "jsonfetch::epoch_seconds::option")]
    pub archived_at: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RepositoryPage {
    pub total: u32,
    pub items: Vec<Repository>,
}

pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jsonfetch=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}
