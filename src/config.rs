//! Runtime configuration
//!
//! Built once at startup from environment variables (a `.env` file is honored)
//! and handed to each component when it is constructed.

use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_COHERE_MODEL: &str = "command-r-08-2024";
pub const DEFAULT_ARCGIS_ELEVATION_URL: &str = "https://elevation-api.arcgis.com/arcgis/rest/services/elevation-service/v1/elevation/at-many-points";
pub const DEFAULT_ELEVATION_BATCH_SIZE: usize = 150;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cohere: CohereConfig,
    pub arcgis: ArcGisConfig,
    pub region: RegionConfig,
    /// Directory holding `index.html` and the static frontend assets
    pub frontend_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub sentry_dsn: Option<String>,
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone)]
pub struct CohereConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone)]
pub struct ArcGisConfig {
    pub api_key: Option<String>,
    pub elevation_url: String,
    pub batch_size: usize,
}

/// Deployment region used to classify routes
#[derive(Debug, Clone, PartialEq)]
pub struct RegionConfig {
    pub name: String,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Upper distance bounds (degrees) for centro_urbano, urbano and suburbano
    pub zone_thresholds: [f64; 3],
    /// Upper bbox span bounds (degrees) for bajo and medio terrain
    pub terrain_thresholds: [f64; 2],
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "Guayaquil, Ecuador".to_string(),
            center_lat: -2.1709,
            center_lon: -79.9224,
            zone_thresholds: [0.05, 0.1, 0.2],
            terrain_thresholds: [0.01, 0.05],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values are treated the same as unset ones
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            url: match get("DATABASE_URL") {
                Some(url) => url,
                None => postgres_url_from_parts(&get)?,
            },
            pool_size: parse_or(&get, "DB_POOL_SIZE", 10)?,
        };

        let cohere = CohereConfig {
            api_key: get("COHERE_API_KEY"),
            base_url: get("COHERE_BASE_URL").unwrap_or_else(|| DEFAULT_COHERE_BASE_URL.to_string()),
            model: get("COHERE_MODEL").unwrap_or_else(|| DEFAULT_COHERE_MODEL.to_string()),
            max_tokens: parse_or(&get, "COHERE_MAX_TOKENS", 1500)?,
            temperature: parse_or(&get, "COHERE_TEMPERATURE", 0.3)?,
        };

        let batch_size = parse_or(&get, "ELEVATION_BATCH_SIZE", DEFAULT_ELEVATION_BATCH_SIZE)?;
        if batch_size == 0 {
            bail!("ELEVATION_BATCH_SIZE must be at least 1");
        }
        let arcgis = ArcGisConfig {
            api_key: get("ARCGIS_API_KEY"),
            elevation_url: get("ARCGIS_ELEVATION_URL")
                .unwrap_or_else(|| DEFAULT_ARCGIS_ELEVATION_URL.to_string()),
            batch_size,
        };

        let defaults = RegionConfig::default();
        let region = RegionConfig {
            name: get("REGION_NAME").unwrap_or(defaults.name),
            center_lat: parse_or(&get, "REGION_CENTER_LAT", defaults.center_lat)?,
            center_lon: parse_or(&get, "REGION_CENTER_LON", defaults.center_lon)?,
            ..RegionConfig::default()
        };

        Ok(Self {
            database,
            cohere,
            arcgis,
            region,
            frontend_dir: get("FRONTEND_DIR").map(PathBuf::from),
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 60)?),
            sentry_dsn: get("SENTRY_DSN"),
            metrics_enabled: parse_or(&get, "METRICS_ENABLED", true)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn postgres_url_from_parts<G>(get: &G) -> Result<String>
where
    G: Fn(&str) -> Option<String>,
{
    let host = get("POSTGRES_HOST").unwrap_or_else(|| "db".to_string());
    let port: u16 = parse_or(get, "POSTGRES_PORT", 5432)?;
    let db = get("POSTGRES_DB").unwrap_or_else(|| "ftth".to_string());

    let mut url = Url::parse(&format!("postgres://{host}:{port}/{db}"))
        .with_context(|| format!("Invalid PostgreSQL host {host:?}"))?;
    let user = get("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string());
    url.set_username(&user)
        .map_err(|_| anyhow::anyhow!("Cannot set PostgreSQL user"))?;
    if let Some(password) = get("POSTGRES_PASSWORD") {
        url.set_password(Some(&password))
            .map_err(|_| anyhow::anyhow!("Cannot set PostgreSQL password"))?;
    }
    if let Some(sslmode) = get("POSTGRES_SSLMODE") {
        url.query_pairs_mut().append_pair("sslmode", &sslmode);
    }

    Ok(url.to_string())
}
