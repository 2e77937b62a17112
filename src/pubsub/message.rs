use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Полезная нагрузка публикации по умолчанию.
///
/// Реестр передаёт её обработчикам по ссылке, без изменений.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum MessagePayload {
    /// Публикация без данных.
    #[default]
    Empty,
    Bytes(Bytes),
    String(String),
    Json(serde_json::Value),
}

impl MessagePayload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Десериализует JSON-нагрузку в конкретный тип.
    pub fn to_json<T: for<'de> Deserialize<'de>>(&self) -> Option<serde_json::Result<T>> {
        self.as_json().map(|v| T::deserialize(v))
    }
}

impl From<Bytes> for MessagePayload {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for MessagePayload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<String> for MessagePayload {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for MessagePayload {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<serde_json::Value> for MessagePayload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<()> for MessagePayload {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}
