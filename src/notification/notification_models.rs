use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Text,
    Photo,
}

impl Transport {
    pub fn for_media(media_url: Option<&str>) -> Self {
        match media_url {
            Some(_) => Transport::Photo,
            None => Transport::Text,
        }
    }
}

/// A rendered, transport-ready notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NotificationPayload {
    pub text: String,
    pub media_url: Option<String>,
}

impl NotificationPayload {
    pub fn transport(&self) -> Transport {
        Transport::for_media(self.media_url.as_deref())
    }
}
