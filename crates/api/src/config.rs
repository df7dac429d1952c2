/// Credentials for the administrative Basic-auth gate.
#[derive(Clone)]
pub struct AdminCredentials {
    pub user: String,
    pub pass: String,
}

impl AdminCredentials {
    /// Read `ADMIN_USER` / `ADMIN_PASS`. Both must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let user = std::env::var("ADMIN_USER").ok().filter(|s| !s.is_empty())?;
        let pass = std::env::var("ADMIN_PASS").ok().filter(|s| !s.is_empty())?;
        Some(Self { user, pass })
    }

    /// Whether the supplied pair matches exactly.
    pub fn matches(&self, user: &str, pass: &str) -> bool {
        self.user == user && self.pass == pass
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// `/health` timeout in seconds (default: `30`). Pass routes have none.
    pub request_timeout_secs: u64,
    /// Resource name every request is addressed to (default: `hallpass`).
    pub resource_name: String,
    /// Admin gate credentials. `None` makes every admin route answer 500.
    pub admin: Option<AdminCredentials>,
    /// PostgreSQL connection string for the pass store.
    pub database_url: Option<String>,
    /// Use the in-process store when no database is configured.
    pub in_memory_store: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `RESOURCE_NAME`        | `hallpass`                 |
    /// | `ADMIN_USER`           | unset                      |
    /// | `ADMIN_PASS`           | unset                      |
    /// | `DATABASE_URL`         | unset                      |
    /// | `HALLPASS_IN_MEMORY`   | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let resource_name = std::env::var("RESOURCE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "hallpass".into());

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let in_memory_store: bool = std::env::var("HALLPASS_IN_MEMORY")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("HALLPASS_IN_MEMORY must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            resource_name,
            admin: AdminCredentials::from_env(),
            database_url,
            in_memory_store,
        }
    }
}
