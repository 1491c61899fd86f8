//! Cache database: connectors, table bootstrap and repositories

pub mod bot_config_repository;
pub mod manager;
pub mod postgres;
pub mod sqlite;
pub mod team_repository;
pub mod tournament_repository;

pub use bot_config_repository::SqlBotConfigRepository;
pub use manager::DbManager;
pub use postgres::PostgresConnector;
pub use sqlite::SqliteConnector;
pub use team_repository::SqlTeamRepository;
pub use tournament_repository::SqlTournamentRepository;
