// ── Controller ──
//
// Entry point for consumers. Owns the API client and the data store,
// fetches lists wholesale, routes commands, and refetches the product list
// after every mutation. A failed fetch leaves the previous snapshot in
// place and is reported through the store's fetch status.

use std::sync::Arc;

use chrono::TimeDelta;
use futures::future::join_all;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info, warn};

use sirs_api::models::ProductPayload;
use sirs_api::{ApiClient, Session, SessionContext};

use crate::command::{BulkFailure, BulkOutcome, Command, CommandResult, validate_draft};
use crate::config::{ClientConfig, Credentials};
use crate::convert::resolve_category_names;
use crate::error::CoreError;
use crate::model::{
    Category, Delivery, EntityId, Notification, Product, ServiceRequest, User,
};
use crate::store::DataStore;

/// Lists the controller knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Products,
    Categories,
    Users,
    ServiceRequests,
    Deliveries,
    Notifications,
}

/// Cheaply cloneable handle (`Arc` inside).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: ApiClient,
    credentials: Option<Credentials>,
    store: Arc<DataStore>,
}

impl Controller {
    /// Build a controller from configuration. Does not touch the network.
    pub fn new(config: ClientConfig, session: SessionContext) -> Result<Self, CoreError> {
        let mut client = ApiClient::new(config.url.as_str(), &config.transport(), session)?
            .with_access_lifetime(TimeDelta::minutes(config.access_lifetime_mins));
        if let Some(path) = config.refresh_path.as_deref() {
            client = client.with_refresh_path(path);
        }
        if let Some(size) = config.fetch_page_size {
            client = client.with_page_size(size);
        }
        Ok(Self::with_client(client, config.credentials))
    }

    /// Wrap an already configured API client.
    pub fn with_client(client: ApiClient, credentials: Option<Credentials>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                client,
                credentials,
                store: Arc::new(DataStore::new()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn session(&self) -> &SessionContext {
        self.inner.client.session()
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Log in with the configured credentials.
    pub async fn login(&self) -> Result<Session, CoreError> {
        let creds = self
            .inner
            .credentials
            .as_ref()
            .ok_or(CoreError::NotLoggedIn)?;
        Ok(self
            .inner
            .client
            .login(&creds.username, &creds.password)
            .await?)
    }

    /// Reuse a restored session if there is one, otherwise log in.
    pub async fn ensure_session(&self) -> Result<(), CoreError> {
        if self.session().is_active() {
            debug!("reusing existing session");
            return Ok(());
        }
        self.login().await.map(|_| ())
    }

    pub fn logout(&self) {
        self.inner.client.logout();
        info!("logged out");
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Fetch one list wholesale and swap it into the store.
    ///
    /// Returns the number of items in the snapshot now being served. On
    /// failure the previous snapshot is kept and the error is recorded in
    /// the fetch status. A response overtaken by a newer fetch is dropped
    /// without touching the fetch status.
    pub async fn refresh(&self, kind: EntityKind) -> Result<usize, CoreError> {
        match self.fetch(kind).await {
            Ok(Some(count)) => {
                self.inner.store.record_success();
                info!(%kind, count, "snapshot applied");
                Ok(count)
            }
            Ok(None) => {
                debug!(%kind, "response overtaken by a newer fetch");
                Ok(self.snapshot_len(kind))
            }
            Err(e) => {
                warn!(%kind, error = %e, "fetch failed; keeping previous snapshot");
                self.inner.store.record_failure(e.to_string());
                Err(e)
            }
        }
    }

    fn snapshot_len(&self, kind: EntityKind) -> usize {
        let store = &self.inner.store;
        match kind {
            EntityKind::Products => store.products_snapshot().len(),
            EntityKind::Categories => store.categories_snapshot().len(),
            EntityKind::Users => store.users_snapshot().len(),
            EntityKind::ServiceRequests => store.service_requests_snapshot().len(),
            EntityKind::Deliveries => store.deliveries_snapshot().len(),
            EntityKind::Notifications => store.notifications_snapshot().len(),
        }
    }

    /// `Some(count)` when the fetched list was applied, `None` when a newer
    /// snapshot was already in place.
    async fn fetch(&self, kind: EntityKind) -> Result<Option<usize>, CoreError> {
        let store = &self.inner.store;
        let client = &self.inner.client;
        let ticket = store.issue_ticket();

        let applied = match kind {
            EntityKind::Products => {
                let mut products: Vec<Product> = client
                    .list_products()
                    .await?
                    .into_iter()
                    .map(Product::from)
                    .collect();
                if products
                    .iter()
                    .any(|p| p.category.as_ref().is_some_and(|c| c.name.is_none()))
                {
                    let categories = self.categories_for_names().await;
                    resolve_category_names(&mut products, &categories);
                }
                let count = products.len();
                store.apply_products(ticket, products).then_some(count)
            }
            EntityKind::Categories => {
                let items: Vec<Category> = client
                    .list_categories()
                    .await?
                    .into_iter()
                    .map(Category::from)
                    .collect();
                let count = items.len();
                store.apply_categories(ticket, items).then_some(count)
            }
            EntityKind::Users => {
                let items: Vec<User> = client
                    .list_users()
                    .await?
                    .into_iter()
                    .map(User::from)
                    .collect();
                let count = items.len();
                store.apply_users(ticket, items).then_some(count)
            }
            EntityKind::ServiceRequests => {
                let items: Vec<ServiceRequest> = client
                    .list_service_requests()
                    .await?
                    .into_iter()
                    .map(ServiceRequest::from)
                    .collect();
                let count = items.len();
                store.apply_service_requests(ticket, items).then_some(count)
            }
            EntityKind::Deliveries => {
                let items: Vec<Delivery> = client
                    .list_deliveries(None)
                    .await?
                    .into_iter()
                    .map(Delivery::from)
                    .collect();
                let count = items.len();
                store.apply_deliveries(ticket, items).then_some(count)
            }
            EntityKind::Notifications => {
                let items: Vec<Notification> = client
                    .list_notifications()
                    .await?
                    .into_iter()
                    .map(Notification::from)
                    .collect();
                let count = items.len();
                store.apply_notifications(ticket, items).then_some(count)
            }
        };
        Ok(applied)
    }

    /// Category list used to name bare category ids. Falls back to the
    /// cached snapshot when the fetch fails.
    async fn categories_for_names(&self) -> Vec<Category> {
        let cached = self.inner.store.categories_snapshot();
        if !cached.is_empty() {
            return cached.iter().map(|c| (**c).clone()).collect();
        }
        match self.inner.client.list_categories().await {
            Ok(items) => {
                let items: Vec<Category> = items.into_iter().map(Category::from).collect();
                let ticket = self.inner.store.issue_ticket();
                self.inner.store.apply_categories(ticket, items.clone());
                items
            }
            Err(e) => {
                debug!(error = %e, "category names unavailable");
                Vec::new()
            }
        }
    }

    /// Fetch a single product straight from the server.
    pub async fn product(&self, id: EntityId) -> Result<Product, CoreError> {
        self.inner
            .client
            .get_product(id.get())
            .await
            .map(Product::from)
            .map_err(|e| product_error(e, id))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run a write operation, then refetch the product list.
    ///
    /// A failed refetch does not fail the command: the mutation already
    /// happened, and the fetch error is recorded in the store.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let client = &self.inner.client;

        let result = match command {
            Command::CreateProduct(draft) => {
                validate_draft(&draft, true)
                    .map_err(|message| CoreError::ValidationFailed { message })?;
                let created = client.create_product(&ProductPayload::from(&draft)).await?;
                info!(id = created.id, "product created");
                CommandResult::Product(Arc::new(Product::from(created)))
            }
            Command::UpdateProduct { id, draft } => {
                validate_draft(&draft, false)
                    .map_err(|message| CoreError::ValidationFailed { message })?;
                let updated = client
                    .update_product(id.get(), &ProductPayload::from(&draft))
                    .await
                    .map_err(|e| product_error(e, id))?;
                info!(%id, "product updated");
                CommandResult::Product(Arc::new(Product::from(updated)))
            }
            Command::DeleteProduct { id } => {
                client
                    .delete_product(id.get())
                    .await
                    .map_err(|e| product_error(e, id))?;
                info!(%id, "product deleted");
                CommandResult::Deleted(id)
            }
            Command::DeleteProducts { ids } => CommandResult::Bulk(self.delete_many(&ids).await),
        };

        if let Err(e) = self.refresh(EntityKind::Products).await {
            warn!(error = %e, "refetch after mutation failed");
        }
        Ok(result)
    }

    /// Delete every id independently. No rollback.
    async fn delete_many(&self, ids: &[EntityId]) -> BulkOutcome {
        let client = &self.inner.client;
        let results = join_all(ids.iter().map(|&id| async move {
            (id, client.delete_product(id.get()).await)
        }))
        .await;

        let mut outcome = BulkOutcome::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    let err = product_error(e, id);
                    warn!(%id, error = %err, "bulk delete item failed");
                    outcome.failed.push(BulkFailure {
                        id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk delete finished"
        );
        outcome
    }
}

/// Name 404s after the product they were about.
fn product_error(err: sirs_api::Error, id: EntityId) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: "Product".into(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}
