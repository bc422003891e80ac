use serde::Serialize;
use utoipa::ToSchema;

/// Reply to an ingested domain event. Delivery happens after the reply is sent.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventAcceptedResponse {
    pub accepted: bool,
    pub notifications_enabled: bool,
}
