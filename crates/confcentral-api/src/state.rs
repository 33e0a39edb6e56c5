//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository traits; AppState pins them to the
//! SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use confcentral_core::service::conference::ConferenceService;
use confcentral_core::service::profile::ProfileService;
use confcentral_core::service::session::SessionService;
use confcentral_core::service::speaker::SpeakerService;
use confcentral_infra::sqlite::conference::SqliteConferenceRepository;
use confcentral_infra::sqlite::pool::DatabasePool;
use confcentral_infra::sqlite::profile::SqliteProfileRepository;
use confcentral_infra::sqlite::session::SqliteSessionRepository;
use confcentral_infra::sqlite::speaker::SqliteSpeakerRepository;
use confcentral_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteConferenceService =
    ConferenceService<SqliteConferenceRepository, SqliteProfileRepository>;

pub type ConcreteSessionService = SessionService<
    SqliteConferenceRepository,
    SqliteSessionRepository,
    SqliteSpeakerRepository,
>;

pub type ConcreteSpeakerService = SpeakerService<SqliteSpeakerRepository>;

pub type ConcreteProfileService = ProfileService<SqliteProfileRepository, SqliteSessionRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub conference_service: Arc<ConcreteConferenceService>,
    pub session_service: Arc<ConcreteSessionService>,
    pub speaker_service: Arc<ConcreteSpeakerService>,
    pub profile_service: Arc<ConcreteProfileService>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: create the data directory, open
    /// the database and wire services.
    pub async fn init(data_dir: PathBuf, config: GlobalConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::open(&data_dir).await?;
        Ok(Self::from_pool(db_pool, config, data_dir))
    }

    /// Wire services on top of an already-open pool.
    pub fn from_pool(db_pool: DatabasePool, config: GlobalConfig, data_dir: PathBuf) -> Self {
        let conference_service = ConferenceService::new(
            SqliteConferenceRepository::new(db_pool.clone()),
            SqliteProfileRepository::new(db_pool.clone()),
            config.nearly_sold_out_seats,
        );

        let session_service = SessionService::new(
            SqliteConferenceRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
            SqliteSpeakerRepository::new(db_pool.clone()),
        );

        let speaker_service = SpeakerService::new(SqliteSpeakerRepository::new(db_pool.clone()));

        let profile_service = ProfileService::new(
            SqliteProfileRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
        );

        Self {
            conference_service: Arc::new(conference_service),
            session_service: Arc::new(session_service),
            speaker_service: Arc::new(speaker_service),
            profile_service: Arc::new(profile_service),
            config,
            data_dir,
            db_pool,
        }
    }
}
