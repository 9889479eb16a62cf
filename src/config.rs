//! Server configuration from flags and environment.
//!
//! Every flag has an env var fallback; a `.env` file is honoured when the
//! binary calls `dotenvy::dotenv()` before parsing.

use anyhow::{anyhow, Context};
use clap::Parser;
use url::Url;

use crate::database::DatabaseConfig;
use crate::directory::{closure::DEFAULT_MAX_RUBRIC_DEPTH, ClosureLimits};
use crate::services::ServiceOptions;

#[derive(Debug, Clone, Parser)]
#[command(name = "handbook_server")]
#[command(about = "Building / company / rubric directory over HTTP")]
#[command(long_about = None)]
pub struct ServerConfig {
    /// Full Postgres URL; overrides the individual connection flags
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// PostgreSQL username
    #[arg(long, env = "HANDBOOK_DB_USER", default_value = "postgres")]
    pub dbuser: String,

    /// PostgreSQL password
    #[arg(long = "pass", env = "HANDBOOK_DB_PASSWORD", default_value = "12345")]
    pub password: String,

    /// PostgreSQL database name
    #[arg(long, env = "HANDBOOK_DB_NAME", default_value = "test")]
    pub dbname: String,

    /// PostgreSQL host
    #[arg(long, env = "HANDBOOK_DB_HOST", default_value = "localhost")]
    pub dbhost: String,

    /// PostgreSQL port
    #[arg(long, env = "HANDBOOK_DB_PORT", default_value_t = 5432)]
    pub dbport: u16,

    /// Listen address
    #[arg(long, env = "HANDBOOK_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Connection pool size
    #[arg(long, env = "HANDBOOK_DB_POOL_SIZE", default_value_t = 10)]
    pub max_connections: u32,

    /// Levels below a rubric that a rubric lookup may expand
    #[arg(long, env = "HANDBOOK_MAX_RUBRIC_DEPTH", default_value_t = DEFAULT_MAX_RUBRIC_DEPTH)]
    pub max_rubric_depth: usize,

    /// Run every data operation under one process-wide lock
    #[arg(long, env = "HANDBOOK_SERIALIZE_ACCESS")]
    pub serialize_access: bool,
}

impl ServerConfig {
    /// `--database-url` if given, else a URL assembled from the parts.
    pub fn database_url(&self) -> anyhow::Result<String> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => compose_database_url(
                &self.dbuser,
                &self.password,
                &self.dbhost,
                self.dbport,
                &self.dbname,
            ),
        }
    }

    pub fn database_config(&self) -> anyhow::Result<DatabaseConfig> {
        Ok(DatabaseConfig {
            database_url: self.database_url()?,
            max_connections: self.max_connections,
            ..DatabaseConfig::default()
        })
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            closure: ClosureLimits {
                max_depth: self.max_rubric_depth,
            },
            serialize_access: self.serialize_access,
        }
    }
}

/// Postgres URL with user, password and database name percent-encoded.
fn compose_database_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    dbname: &str,
) -> anyhow::Result<String> {
    let mut url = Url::parse(&format!("postgresql://{host}:{port}"))
        .with_context(|| format!("invalid database host '{host}'"))?;
    url.set_username(user)
        .map_err(|_| anyhow!("cannot set database user on {url}"))?;
    url.set_password(Some(password))
        .map_err(|_| anyhow!("cannot set database password on {url}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("database URL cannot carry a path"))?
        .clear()
        .push(dbname);
    url.query_pairs_mut().append_pair("sslmode", "disable");
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_built_from_parts() {
        let url = compose_database_url("alice", "secret", "db", 6543, "handbook").unwrap();
        assert_eq!(url, "postgresql://alice:secret@db:6543/handbook?sslmode=disable");
    }

    #[test]
    fn reserved_characters_in_credentials_are_encoded() {
        let raw = compose_database_url("postgres", "p@ss/w#rd", "db.internal", 5432, "test")
            .unwrap();
        let url = Url::parse(&raw).unwrap();

        assert_eq!(url.host_str(), Some("db.internal"));
        assert_eq!(url.port(), Some(5432));
        assert_eq!(url.username(), "postgres");
        assert_eq!(url.password(), Some("p%40ss%2Fw%23rd"));
        assert_eq!(url.path(), "/test");
        assert_eq!(url.query(), Some("sslmode=disable"));
    }

    #[test]
    fn flags_feed_the_composed_url() {
        let config = ServerConfig::parse_from([
            "handbook_server",
            "--database-url",
            "postgresql://x@y/z",
            "--max-connections",
            "3",
        ]);
        let db = config.database_config().unwrap();
        assert_eq!(db.database_url, "postgresql://x@y/z");
        assert_eq!(db.max_connections, 3);
    }

    #[test]
    fn explicit_url_wins() {
        let config = ServerConfig::parse_from([
            "handbook_server",
            "--database-url",
            "postgresql://x@y/z",
        ]);
        assert_eq!(config.database_url().unwrap(), "postgresql://x@y/z");
    }

    #[test]
    fn service_options_follow_flags() {
        let config = ServerConfig::parse_from([
            "handbook_server",
            "--max-rubric-depth",
            "5",
            "--serialize-access",
        ]);
        let options = config.service_options();
        assert_eq!(options.closure.max_depth, 5);
        assert!(options.serialize_access);
    }
}
