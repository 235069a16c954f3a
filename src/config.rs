use crate::managers::ranking::DEFAULT_LEADERBOARD_SIZE;
use color_eyre::eyre::{eyre, Report};
use dotenv::dotenv;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::info;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageBackend {
    Memory,
    File,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "postgres" => Ok(StorageBackend::Postgres),
            other => Err(format!("unknown storage backend {:?}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub leaderboard_size: usize,
}

impl Config {
    /// Reads `.env` first, then the process environment.
    pub fn from_env() -> Result<Self, Report> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Report>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage: StorageBackend = try_load(&lookup, "IDEAS_STORAGE", "file")?;
        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(eyre!("DATABASE_URL must be set for postgres storage"));
        }
        Ok(Self {
            storage,
            data_dir: try_load(&lookup, "IDEAS_DATA_DIR", "./data")?,
            database_url,
            leaderboard_size: try_load(
                &lookup,
                "LEADERBOARD_SIZE",
                &DEFAULT_LEADERBOARD_SIZE.to_string(),
            )?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, Report>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_owned()
    });
    raw.parse()
        .map_err(|err| eyre!("Invalid {} value {:?}: {}", key, raw, err))
}
