// User account endpoints.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::UserResponse;

impl ApiClient {
    /// All user accounts (admin only on the backend).
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, Error> {
        self.list("users/", &[]).await
    }
}
