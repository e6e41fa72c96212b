//! Configuration for the Todo API

use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};

pub use core_config::Environment;

/// Which repository backs the task store.
///
/// Selected with `TASK_STORE` (`memory` or `postgres`). When the variable
/// is unset, Postgres is used if `DATABASE_URL` is present, otherwise the
/// process falls back to the in-memory store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStore {
    Memory,
    Postgres,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub task_store: TaskStore,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let task_store = task_store_from_env()?;
        let cors_origin = env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:3000");

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            task_store,
            cors_origin,
        })
    }
}

fn task_store_from_env() -> eyre::Result<TaskStore> {
    match std::env::var("TASK_STORE") {
        Ok(value) => match value.to_lowercase().as_str() {
            "memory" => Ok(TaskStore::Memory),
            "postgres" => Ok(TaskStore::Postgres),
            other => Err(eyre::eyre!(
                "Invalid TASK_STORE '{other}', expected 'memory' or 'postgres'"
            )),
        },
        Err(_) => {
            if std::env::var("DATABASE_URL").is_ok() {
                Ok(TaskStore::Postgres)
            } else {
                Ok(TaskStore::Memory)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_store_defaults_to_memory() {
        temp_env::with_vars_unset(["TASK_STORE", "DATABASE_URL"], || {
            assert_eq!(task_store_from_env().unwrap(), TaskStore::Memory);
        });
    }

    #[test]
    fn test_task_store_follows_database_url() {
        temp_env::with_vars(
            [
                ("TASK_STORE", None),
                ("DATABASE_URL", Some("postgres://localhost/todo")),
            ],
            || {
                assert_eq!(task_store_from_env().unwrap(), TaskStore::Postgres);
            },
        );
    }

    #[test]
    fn test_task_store_explicit_memory_wins() {
        temp_env::with_vars(
            [
                ("TASK_STORE", Some("memory")),
                ("DATABASE_URL", Some("postgres://localhost/todo")),
            ],
            || {
                assert_eq!(task_store_from_env().unwrap(), TaskStore::Memory);
            },
        );
    }

    #[test]
    fn test_task_store_rejects_unknown_value() {
        temp_env::with_var("TASK_STORE", Some("cassandra"), || {
            assert!(task_store_from_env().is_err());
        });
    }

    #[test]
    fn test_cors_origin_default() {
        temp_env::with_vars_unset(
            ["TASK_STORE", "DATABASE_URL", "CORS_ALLOWED_ORIGIN", "HOST", "PORT"],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.cors_origin, "http://localhost:3000");
            },
        );
    }
}
