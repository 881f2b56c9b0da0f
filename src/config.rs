//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable            | Default        | Meaning                                   |
//! |---------------------|----------------|-------------------------------------------|
//! | `LISTEN_ADDR`       | `0.0.0.0:3000` | Bind address                              |
//! | `PORT`              | —              | Used as `0.0.0.0:$PORT` if `LISTEN_ADDR` is unset |
//! | `REMATCH_DELAY_MS`  | `1000`         | Delay before `next-partner` rematches     |
//! | `MAX_MESSAGE_BYTES` | `65536`        | Largest accepted WebSocket frame          |
//! | `MAX_CHAT_CHARS`    | `2000`         | Longest accepted chat message             |
//! | `MAX_PARTICIPANTS`  | `0`            | Concurrent connection cap (0 = unlimited) |
//! | `STATIC_DIR`        | —              | Directory served at `/` when set          |
//! | `LOG_FORMAT`        | `text`         | `text` or `json`                          |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// How long `next-partner` waits before re-entering matchmaking.
    pub rematch_delay: Duration,

    /// Maximum size of a single inbound WebSocket message.
    pub max_message_bytes: usize,

    /// Maximum chat message length in characters.
    pub max_chat_chars: usize,

    /// Maximum concurrent participants; `0` disables the cap.
    pub max_participants: usize,

    /// Optional directory with the browser client.
    pub static_dir: Option<PathBuf>,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rematch_delay: Duration::from_millis(1000),
            max_message_bytes: 64 * 1024,
            max_chat_chars: 2000,
            max_participants: 0,
            static_dir: None,
            log_format: LogFormat::Text,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `LISTEN_ADDR`, `PORT` or
    /// `LOG_FORMAT` is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match (lookup("LISTEN_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LISTEN_ADDR",
                value: addr,
            })?,
            (None, Some(port)) => {
                let port: u16 = port.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PORT",
                    value: port,
                })?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => defaults.listen_addr,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") | Some("TEXT") => LogFormat::Text,
            Some("json") | Some("JSON") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            listen_addr,
            rematch_delay: Duration::from_millis(parse_or(&lookup, "REMATCH_DELAY_MS", 1000)),
            max_message_bytes: parse_or(&lookup, "MAX_MESSAGE_BYTES", defaults.max_message_bytes),
            max_chat_chars: parse_or(&lookup, "MAX_CHAT_CHARS", defaults.max_chat_chars),
            max_participants: parse_or(&lookup, "MAX_PARTICIPANTS", defaults.max_participants),
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
