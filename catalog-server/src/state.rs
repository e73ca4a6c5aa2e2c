//! Application state for catalog-server

use crate::auth::JwtService;
use crate::config::Config;
use crate::merging::MergeService;
use crate::storage::CatalogStorage;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Editor tokens stay valid for a day
const JWT_EXPIRY_MINUTES: i64 = 24 * 60;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Merge engine (owns the catalog storage handle)
    pub merger: MergeService,
    /// Editor token validation
    pub jwt: JwtService,
}

impl AppState {
    /// Open the catalog database under `config.data_dir`
    pub fn new(config: &Config) -> Result<Self, BoxError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let path = config.database_path();
        let storage = CatalogStorage::open(&path)?;
        tracing::info!(path = %path.display(), "Catalog database opened");

        Ok(Self::with_storage(
            storage,
            JwtService::new(&config.jwt_secret, JWT_EXPIRY_MINUTES),
        ))
    }

    pub fn with_storage(storage: CatalogStorage, jwt: JwtService) -> Self {
        Self {
            merger: MergeService::new(storage),
            jwt,
        }
    }

    pub fn storage(&self) -> &CatalogStorage {
        self.merger.storage()
    }
}
