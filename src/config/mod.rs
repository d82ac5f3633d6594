use serde::Deserialize;
use std::env;

// Top-level configuration, one sub-struct per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
}

// HTTP server and logging
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

// Local SQLite file holding the drafts
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Draft slot and upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    // row id of the single structured draft
    pub draft_slot: i64,
    // key of the flat JSON mirror read by the ticket page
    pub fallback_key: String,
    pub upload_limit_bytes: usize,
    // uploads kept in memory before the oldest is evicted
    pub avatar_capacity: usize,
}

// Ticket image export
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub scale: f32,
    pub fonts_dir: Option<String>,
    pub load_system_fonts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "ticz=debug,tower_http=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig {
                url: "sqlite://ticz.db".to_string(),
                pool_size: 5,
            },
            storage: StorageConfig {
                draft_slot: 1,
                fallback_key: "ticketData".to_string(),
                upload_limit_bytes: 10 * 1024 * 1024,
                avatar_capacity: 64,
            },
            render: RenderConfig {
                scale: 2.0,
                fonts_dir: None,
                load_system_fonts: true,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: env::var("PORT")
                    .unwrap_or_else(|_| defaults.app.port.to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
                log_format: match env::var("LOG_FORMAT").as_deref() {
                    Ok("json") => LogFormat::Json,
                    Ok("pretty") | Err(_) => LogFormat::Pretty,
                    Ok(other) => panic!("LOG_FORMAT must be pretty or json, got {other}"),
                },
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| defaults.database.pool_size.to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            storage: StorageConfig {
                draft_slot: env::var("DRAFT_SLOT")
                    .unwrap_or_else(|_| defaults.storage.draft_slot.to_string())
                    .parse()
                    .expect("DRAFT_SLOT must be a valid number"),
                fallback_key: env::var("FALLBACK_KEY").unwrap_or(defaults.storage.fallback_key),
                upload_limit_bytes: env::var("UPLOAD_LIMIT_BYTES")
                    .unwrap_or_else(|_| defaults.storage.upload_limit_bytes.to_string())
                    .parse()
                    .expect("UPLOAD_LIMIT_BYTES must be a valid number"),
                avatar_capacity: env::var("AVATAR_CAPACITY")
                    .unwrap_or_else(|_| defaults.storage.avatar_capacity.to_string())
                    .parse()
                    .expect("AVATAR_CAPACITY must be a valid number"),
            },
            render: RenderConfig {
                scale: env::var("RENDER_SCALE")
                    .unwrap_or_else(|_| defaults.render.scale.to_string())
                    .parse()
                    .expect("RENDER_SCALE must be a valid number"),
                fonts_dir: env::var("FONTS_DIR").ok().filter(|dir| !dir.trim().is_empty()),
                load_system_fonts: env::var("LOAD_SYSTEM_FONTS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("LOAD_SYSTEM_FONTS must be true or false"),
            },
        }
    }
}
