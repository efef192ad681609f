/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Base URL of the Nominatim-compatible geocoding service.
    pub geocoder_url: String,
    /// Base URL of the Open-Meteo-compatible forecast service.
    pub forecast_url: String,
    pub http_user_agent: String,
    /// Timeout applied to each outbound request (geocode, forecast).
    pub http_timeout_secs: u64,
    /// Emit logs as JSON lines (`LOG_FORMAT=json`) instead of plain text.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://horse-blankets.db".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            geocoder_url: std::env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            forecast_url: std::env::var("FORECAST_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com".to_string()),
            http_user_agent: std::env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| "HorseBlankets/0.1 (household blanket planner)".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("HTTP_TIMEOUT_SECS must be a whole number of seconds"),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| is_json_format(&v))
                .unwrap_or(false),
        }
    }
}

fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Only this test touches these variables, so parallel tests in the
        // same binary cannot observe the mutation.
        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("PORT");
            std::env::remove_var("GEOCODER_URL");
            std::env::remove_var("FORECAST_URL");
            std::env::remove_var("HTTP_USER_AGENT");
            std::env::remove_var("HTTP_TIMEOUT_SECS");
            std::env::remove_var("LOG_FORMAT");
        }

        let config = AppConfig::from_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite://horse-blankets.db");
        assert!(config.geocoder_url.contains("nominatim"));
        assert!(config.forecast_url.contains("open-meteo"));
        assert!(config.http_user_agent.starts_with("HorseBlankets"));
        assert_eq!(config.http_timeout_secs, 10);
        assert!(!config.log_json);
    }

    #[test]
    fn test_log_format_parsing() {
        assert!(is_json_format("json"));
        assert!(is_json_format(" JSON "));
        assert!(!is_json_format("text"));
        assert!(!is_json_format(""));
    }
}
