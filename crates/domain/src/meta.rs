use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TransportError;

#[allow(async_fn_in_trait)]
pub trait MetaService {
    async fn ping(&self) -> Result<bool, TransportError>;
    async fn read_server_time(&self) -> Result<DateTime<Utc>, TransportError>;
}

#[allow(async_fn_in_trait)]
pub trait MetaRepository {
    async fn read_ping(&self) -> Result<Pong, TransportError>;
    async fn read_time(&self) -> Result<ServerTime, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pong {
    #[serde(default)]
    pub pong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    pub utc: String,
}

impl ServerTime {
    pub fn timestamp(&self) -> Result<DateTime<Utc>, TransportError> {
        crate::session::parse_timestamp(&self.utc).ok_or_else(|| {
            TransportError::Deserialization(format!("invalid server time \"{}\"", self.utc))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pong_deserialization() {
        assert_eq!(
            serde_json::from_value::<Pong>(json!({ "pong": true })).unwrap(),
            Pong { pong: true }
        );
        assert_eq!(
            serde_json::from_value::<Pong>(json!({})).unwrap(),
            Pong { pong: false }
        );
    }

    #[test]
    fn test_server_time() {
        assert_eq!(
            ServerTime {
                utc: "2024-02-01T08:30:00.250000+00:00".to_string()
            }
            .timestamp()
            .unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_server_time_invalid() {
        assert_eq!(
            ServerTime {
                utc: "noon".to_string()
            }
            .timestamp(),
            Err(TransportError::Deserialization(
                "invalid server time \"noon\"".to_string()
            ))
        );
    }
}
