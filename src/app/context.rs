use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, ScoutError};
use crate::config::Config;
use crate::normalizer::Normalizer;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub config: Config,
    pub normalizer: Normalizer,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let normalizer = Normalizer::with_policy(config.crawl.multi_axis_policy);

        Ok(Self {
            store,
            config,
            normalizer,
        })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        let normalizer = Normalizer::with_policy(config.crawl.multi_axis_policy);

        Ok(Self {
            store,
            config,
            normalizer,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ScoutError::Other("Could not find data directory".into()))?;
        let app_dir = data_dir.join("gpuscout");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("gpuscout.db"))
    }
}
