use crate::error::{
    BadEnvVarSnafu, ParseMaxConnectionsSnafu, ParsePortSnafu, StudentsResult,
    UnknownStoreBackendSnafu,
};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_config: Arc<ServerConfig>,
    db_config: Option<Arc<DbConfig>>,
}

impl RuntimeConfiguration {
    pub fn new() -> StudentsResult<Self> {
        let server_config = ServerConfig::from_lookup(|name| var(name).ok())?;
        let db_config = match server_config.store_backend {
            StoreBackend::Postgres => Some(Arc::new(DbConfig::new()?)),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            server_config: Arc::new(server_config),
            db_config,
        })
    }

    #[cfg(test)]
    pub fn in_memory(server_ip: impl Into<String>) -> Self {
        let server_ip = server_ip.into();
        Self {
            server_config: Arc::new(ServerConfig {
                api_base_url: default_api_base_url(&server_ip),
                server_ip,
                store_backend: StoreBackend::Memory,
                max_connections: DEFAULT_MAX_CONNECTIONS,
            }),
            db_config: None,
        }
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    pub fn db_config(&self) -> Option<Arc<DbConfig>> {
        self.db_config.clone()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_ip: String,
    /// Where the UI's client data layer sends its requests, usually this same server.
    pub api_base_url: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
}

impl ServerConfig {
    fn from_lookup(get_env_var: impl Fn(&'static str) -> Option<String>) -> StudentsResult<Self> {
        let server_ip =
            get_env_var("STUDENTS_SERVER_IP").unwrap_or_else(|| DEFAULT_SERVER_IP.to_string());
        let api_base_url = get_env_var("STUDENTS_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_api_base_url(&server_ip));

        let store_backend = match get_env_var("STUDENTS_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(value) => return UnknownStoreBackendSnafu { value }.fail(),
        };

        let max_connections = get_env_var("STUDENTS_DB_MAX_CONNECTIONS")
            .map(|raw| raw.parse().context(ParseMaxConnectionsSnafu))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            server_ip,
            api_base_url,
            store_backend,
            max_connections,
        })
    }
}

fn default_api_base_url(server_ip: &str) -> String {
    format!("http://{server_ip}/api/students")
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    pub fn new() -> StudentsResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
