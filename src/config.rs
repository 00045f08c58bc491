// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `31415` |
//! | `AUTH0_DOMAIN` | Trusted issuer domain (derives issuer and JWKS URL) | Required unless both overrides are set |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | `https://{AUTH0_DOMAIN}/` |
//! | `AUTH_JWKS_URL` | JWKS endpoint (HTTPS only) | `https://{AUTH0_DOMAIN}/.well-known/jwks.json` |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_ALGORITHM` | The single accepted signing algorithm (asymmetric only) | `RS256` |
//! | `AUTH_ROLES_CLAIM` | Custom claim carrying role names | Required |
//! | `MODERATOR_ROLE` | Role allowed to moderate and delete any comment | `Admin` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Timeout for one JWKS fetch | `10` |
//! | `DATA_DIR` | Directory for JSON comment files (in-memory when unset) | unset |
//! | `CORS_ALLOWED_ORIGIN` | Allowed browser origin (permissive when unset) | unset |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; HTTPS is served when both are set | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_ALGORITHM_ENV: &str = "AUTH_ALGORITHM";
pub const AUTH_ROLES_CLAIM_ENV: &str = "AUTH_ROLES_CLAIM";
pub const MODERATOR_ROLE_ENV: &str = "MODERATOR_ROLE";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
/// Directory for comment JSON files.
///
/// When unset, comments live in memory and are lost on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const CORS_ALLOWED_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 31415;
const DEFAULT_MODERATOR_ROLE: &str = "Admin";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Configuration error raised at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Everything the token verifier and the authorization policy need.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Expected `iss`, compared by exact string equality
    pub issuer: String,
    /// Expected `aud`
    pub audience: String,
    /// Key-set endpoint
    pub jwks_url: String,
    /// The only accepted signing algorithm
    pub algorithm: Algorithm,
    /// Claim carrying role names
    pub role_claim: String,
    /// Role allowed to change status and delete any comment
    pub moderator_role: String,
    /// Timeout for a single key-set fetch
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            server: load_server(&get)?,
            auth: load_auth(&get)?,
        })
    }
}

fn load_server(get: &impl Fn(&str) -> Option<String>) -> Result<ServerSettings, ConfigError> {
    let port = match get(PORT_ENV) {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid(PORT_ENV, e.to_string()))?,
        None => DEFAULT_PORT,
    };

    let cors_origin = match get(CORS_ALLOWED_ORIGIN_ENV) {
        Some(origin) => {
            Url::parse(&origin).map_err(|e| ConfigError::invalid(CORS_ALLOWED_ORIGIN_ENV, e.to_string()))?;
            Some(origin.trim_end_matches('/').to_string())
        }
        None => None,
    };

    let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
        (Some(cert), Some(key)) => Some(TlsPaths {
            cert: cert.into(),
            key: key.into(),
        }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
        (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
    };

    let log_format = match get(LOG_FORMAT_ENV).as_deref() {
        None | Some("pretty") => LogFormat::Pretty,
        Some("json") => LogFormat::Json,
        Some(other) => {
            return Err(ConfigError::invalid(
                LOG_FORMAT_ENV,
                format!("expected 'json' or 'pretty', got '{other}'"),
            ))
        }
    };

    Ok(ServerSettings {
        host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
        data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
        cors_origin,
        tls,
        log_format,
    })
}

fn load_auth(get: &impl Fn(&str) -> Option<String>) -> Result<AuthSettings, ConfigError> {
    let domain = get(AUTH0_DOMAIN_ENV)
        .map(|d| validate_domain(&d))
        .transpose()?;

    let issuer = match (get(AUTH_ISSUER_ENV), &domain) {
        (Some(issuer), _) => issuer,
        (None, Some(domain)) => format!("https://{domain}/"),
        (None, None) => return Err(ConfigError::Missing(AUTH0_DOMAIN_ENV)),
    };

    let jwks_url = match (get(AUTH_JWKS_URL_ENV), &domain) {
        (Some(url), _) => url,
        (None, Some(domain)) => format!("https://{domain}/.well-known/jwks.json"),
        (None, None) => return Err(ConfigError::Missing(AUTH0_DOMAIN_ENV)),
    };
    let parsed = Url::parse(&jwks_url).map_err(|e| ConfigError::invalid(AUTH_JWKS_URL_ENV, e.to_string()))?;
    if parsed.scheme() != "https" {
        return Err(ConfigError::invalid(AUTH_JWKS_URL_ENV, "JWKS must be fetched over https"));
    }

    let algorithm = match get(AUTH_ALGORITHM_ENV) {
        Some(raw) => parse_asymmetric_algorithm(&raw)?,
        None => Algorithm::RS256,
    };

    let fetch_timeout = match get(JWKS_FETCH_TIMEOUT_ENV) {
        Some(raw) => {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid(JWKS_FETCH_TIMEOUT_ENV, e.to_string()))?;
            if secs == 0 {
                return Err(ConfigError::invalid(JWKS_FETCH_TIMEOUT_ENV, "must be at least 1"));
            }
            Duration::from_secs(secs)
        }
        None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
    };

    Ok(AuthSettings {
        issuer,
        audience: get(AUTH_AUDIENCE_ENV).ok_or(ConfigError::Missing(AUTH_AUDIENCE_ENV))?,
        jwks_url,
        algorithm,
        role_claim: get(AUTH_ROLES_CLAIM_ENV).ok_or(ConfigError::Missing(AUTH_ROLES_CLAIM_ENV))?,
        moderator_role: get(MODERATOR_ROLE_ENV).unwrap_or_else(|| DEFAULT_MODERATOR_ROLE.to_string()),
        fetch_timeout,
    })
}

fn validate_domain(domain: &str) -> Result<String, ConfigError> {
    let domain = domain.trim_end_matches('/');
    if domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::invalid(
            AUTH0_DOMAIN_ENV,
            "expected a bare host name such as tenant.auth0.com",
        ));
    }
    Ok(domain.to_string())
}

/// Parse an algorithm name, refusing anything symmetric.
pub fn parse_asymmetric_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw)
        .map_err(|_| ConfigError::invalid(AUTH_ALGORITHM_ENV, format!("unknown algorithm '{raw}'")))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Err(ConfigError::invalid(
            AUTH_ALGORITHM_ENV,
            "symmetric algorithms are not accepted",
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    const REQUIRED: &[(&str, &str)] = &[
        (AUTH0_DOMAIN_ENV, "tenant.auth0.com"),
        (AUTH_AUDIENCE_ENV, "https://api.portfolio.example"),
        (AUTH_ROLES_CLAIM_ENV, "https://portfolio.example/roles"),
    ];

    #[test]
    fn derives_issuer_and_jwks_from_domain() {
        let config = load(REQUIRED).unwrap();
        assert_eq!(config.auth.issuer, "https://tenant.auth0.com/");
        assert_eq!(config.auth.jwks_url, "https://tenant.auth0.com/.well-known/jwks.json");
        assert_eq!(config.auth.algorithm, Algorithm::RS256);
        assert_eq!(config.auth.moderator_role, "Admin");
        assert_eq!(config.auth.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.server.port, 31415);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert!(config.server.data_dir.is_none());
    }

    #[test]
    fn overrides_take_precedence() {
        let mut vars = REQUIRED.to_vec();
        vars.push((AUTH_ISSUER_ENV, "https://login.portfolio.example/"));
        vars.push((AUTH_JWKS_URL_ENV, "https://login.portfolio.example/jwks"));
        vars.push((MODERATOR_ROLE_ENV, "Moderator"));
        let config = load(&vars).unwrap();
        assert_eq!(config.auth.issuer, "https://login.portfolio.example/");
        assert_eq!(config.auth.jwks_url, "https://login.portfolio.example/jwks");
        assert_eq!(config.auth.moderator_role, "Moderator");
    }

    #[test]
    fn audience_and_role_claim_are_required() {
        let err = load(&[(AUTH0_DOMAIN_ENV, "tenant.auth0.com")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(AUTH_AUDIENCE_ENV));

        let err = load(&REQUIRED[..2]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(AUTH_ROLES_CLAIM_ENV));
    }

    #[test]
    fn issuer_source_is_required() {
        let err = load(&REQUIRED[1..]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(AUTH0_DOMAIN_ENV));
    }

    #[test]
    fn symmetric_algorithm_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push((AUTH_ALGORITHM_ENV, "HS256"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: AUTH_ALGORITHM_ENV, .. })
        ));

        assert_eq!(parse_asymmetric_algorithm("ES256").unwrap(), Algorithm::ES256);
    }

    #[test]
    fn plain_http_jwks_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push((AUTH_JWKS_URL_ENV, "http://tenant.auth0.com/.well-known/jwks.json"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: AUTH_JWKS_URL_ENV, .. })
        ));
    }

    #[test]
    fn domain_with_scheme_is_rejected() {
        let mut vars = REQUIRED[1..].to_vec();
        vars.push((AUTH0_DOMAIN_ENV, "https://tenant.auth0.com"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: AUTH0_DOMAIN_ENV, .. })
        ));
    }

    #[test]
    fn tls_requires_both_paths() {
        let mut vars = REQUIRED.to_vec();
        vars.push((TLS_CERT_PATH_ENV, "/etc/tls/cert.pem"));
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing(TLS_KEY_PATH_ENV));

        vars.push((TLS_KEY_PATH_ENV, "/etc/tls/key.pem"));
        let config = load(&vars).unwrap();
        assert_eq!(
            config.server.tls,
            Some(TlsPaths {
                cert: "/etc/tls/cert.pem".into(),
                key: "/etc/tls/key.pem".into(),
            })
        );
    }

    #[test]
    fn server_settings_parse() {
        let mut vars = REQUIRED.to_vec();
        vars.push((PORT_ENV, "8080"));
        vars.push((LOG_FORMAT_ENV, "json"));
        vars.push((DATA_DIR_ENV, "/var/lib/comments"));
        vars.push((CORS_ALLOWED_ORIGIN_ENV, "https://portfolio.example/"));
        let config = load(&vars).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.data_dir, Some(PathBuf::from("/var/lib/comments")));
        assert_eq!(config.server.cors_origin.as_deref(), Some("https://portfolio.example"));

        let mut bad = REQUIRED.to_vec();
        bad.push((PORT_ENV, "not-a-port"));
        assert!(matches!(load(&bad), Err(ConfigError::Invalid { name: PORT_ENV, .. })));
    }
}
