use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub from: String,
    pub confirmation_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// `APP_HOST`:`APP_PORT`, default `0.0.0.0:8080`.
    pub listen_addr: SocketAddr,
    /// Base URL used when building links sent to users.
    pub public_url: String,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
        let listen_addr = parse_listen_addr(&host, &port)?;
        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let email = EmailConfig {
            from: std::env::var("EMAIL_FROM").unwrap_or_else(|_| "contato@tabnews.com.br".into()),
            confirmation_ttl_minutes: std::env::var("EMAIL_CONFIRMATION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            database_url,
            listen_addr,
            public_url,
            email,
        })
    }
}

fn parse_listen_addr(host: &str, port: &str) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", host, port))
}
