// sirs-core: domain model, client-side query engine and snapshot data
// layer between sirs-api and the CLI/TUI.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod query;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{BulkFailure, BulkOutcome, Command, CommandResult};
pub use config::{ClientConfig, Credentials, TlsVerification};
pub use controller::{Controller, EntityKind};
pub use error::CoreError;
pub use store::{DataStore, FetchStatus, RequestTicket};

pub use model::{
    Category, CategoryLink, Delivery, DeliveryStatus, Entity, EntityId, Notification,
    NotificationKind, Product, ProductDraft, ProductField, ServiceKind, ServiceRequest,
    ServiceStatus, StockLevel, User, UserRole,
};
pub use query::{
    CategoryFilter, DerivedView, FilterCriteria, FilterPatch, PageWindow, SavedView, SortDirection,
    SortSpec, StockFilter, Summary, ViewController,
};

pub use sirs_api::{Session, SessionContext};
