use crate::cors::AllowedOrigins;

pub const DEFAULT_MAX_SCORES_LIMIT: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Service settings read from the environment (and `.env`).
/// Address, port and other server tuning come from Rocket's own configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Connection string of the score store, including the database name.
    pub database_url: String,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: AllowedOrigins,
    /// Upper bound applied to the `limit` of leaderboard requests.
    pub max_scores_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| dotenv::var(var).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(origins) => AllowedOrigins::parse(&origins),
            None => AllowedOrigins::Any,
        };

        let max_scores_limit = match lookup("SCORES_MAX_LIMIT") {
            None => DEFAULT_MAX_SCORES_LIMIT,
            Some(value) => match value.trim().parse::<i64>() {
                Ok(limit) if limit > 0 => limit,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "SCORES_MAX_LIMIT",
                        value,
                        reason: "must be positive".to_owned(),
                    })
                }
                Err(error) => {
                    return Err(ConfigError::Invalid {
                        var: "SCORES_MAX_LIMIT",
                        value,
                        reason: error.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            database_url,
            cors_origins,
            max_scores_limit,
        })
    }
}
