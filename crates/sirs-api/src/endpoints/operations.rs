// After-sales endpoints: service requests, deliveries, notifications.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DeliveryResponse, NotificationResponse, ServiceRequestResponse};

impl ApiClient {
    pub async fn list_service_requests(&self) -> Result<Vec<ServiceRequestResponse>, Error> {
        self.list("service-requests/", &[]).await
    }

    /// Deliveries, optionally narrowed to one status (`pending`, `in_transit`, ...).
    pub async fn list_deliveries(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<DeliveryResponse>, Error> {
        let params: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.to_owned())])
            .unwrap_or_default();
        self.list("deliveries/", &params).await
    }

    pub async fn list_notifications(&self) -> Result<Vec<NotificationResponse>, Error> {
        self.list("notifications/", &[]).await
    }
}
