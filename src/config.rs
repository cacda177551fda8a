use dotenvy::dotenv;
use std::env;

fn env_parsed<T: std::str::FromStr>(name: &str, default: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|e| panic!("{name} must be a number: {e:?}"))
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            database_max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", "10"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env_parsed("ACCESS_TOKEN_TTL", "900"), // 15 min
            refresh_token_ttl: env_parsed("REFRESH_TOKEN_TTL", "604800"), // 7 days

            rate_login_per_min: env_parsed("RATE_LOGIN_PER_MIN", "60"),
            rate_register_per_min: env_parsed("RATE_REGISTER_PER_MIN", "30"),
            rate_refresh_per_min: env_parsed("RATE_REFRESH_PER_MIN", "30"),
            rate_protected_per_min: env_parsed("RATE_PROTECTED_PER_MIN", "1000"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
