use std::time::Duration;

use crate::engine::JobTimeline;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight job timelines (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// State boundaries applied to every submitted job.
    pub timeline: JobTimeline,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `8000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `JOB_RESUME_AFTER_MS`   | `2000`                     |
    /// | `JOB_EXECUTE_AFTER_MS`  | `5000`                     |
    /// | `JOB_COMPLETE_AFTER_MS` | `8000`                     |
    ///
    /// Panics on unparseable values or a timeline whose boundaries are not
    /// strictly increasing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let defaults = JobTimeline::default();
        let timeline = JobTimeline::new(
            millis_from_env("JOB_RESUME_AFTER_MS", defaults.resume_after),
            millis_from_env("JOB_EXECUTE_AFTER_MS", defaults.execute_after),
            millis_from_env("JOB_COMPLETE_AFTER_MS", defaults.complete_after),
        )
        .unwrap_or_else(|e| panic!("Invalid job timeline: {e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            timeline,
        }
    }
}

fn millis_from_env(var: &str, default: Duration) -> Duration {
    match std::env::var(var) {
        Ok(raw) => Duration::from_millis(
            raw.parse()
                .unwrap_or_else(|_| panic!("{var} must be a valid u64")),
        ),
        Err(_) => default,
    }
}
