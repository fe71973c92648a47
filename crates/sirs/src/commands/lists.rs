//! Read-only list handlers: categories, users, service requests,
//! deliveries, notifications.
//!
//! Each list is fetched wholesale, then searched and paged locally with the
//! same page window the product table uses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tabled::Tabled;

use sirs_core::query::{ListPage, Searchable, search_page};
use sirs_core::{
    Category, Controller, Delivery, Entity, EntityKind, Notification, PageWindow, ServiceRequest,
    User,
};

use crate::cli::{GlobalOpts, ListOnlyArgs, ListOnlyCommand, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Products")]
    products: u64,
}

impl From<&Arc<Category>> for CategoryRow {
    fn from(c: &Arc<Category>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            parent: c.parent.as_ref().map(ToString::to_string).unwrap_or_default(),
            products: c.product_count,
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: bool,
}

impl From<&Arc<User>> for UserRow {
    fn from(u: &Arc<User>) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            name: u.display_name(),
            email: u.email.clone().unwrap_or_default(),
            role: u.role.to_string(),
            active: u.is_active,
        }
    }
}

#[derive(Tabled)]
struct ServiceRequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Arc<ServiceRequest>> for ServiceRequestRow {
    fn from(r: &Arc<ServiceRequest>) -> Self {
        Self {
            id: r.id.to_string(),
            customer: r.customer.clone(),
            product: r.product.clone(),
            kind: r.kind.to_string(),
            status: r.status.to_string(),
            assignee: r.assignee.clone().unwrap_or_default(),
            created: short_time(r.created_at),
        }
    }
}

#[derive(Tabled)]
struct DeliveryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Arc<Delivery>> for DeliveryRow {
    fn from(d: &Arc<Delivery>) -> Self {
        Self {
            id: d.id.to_string(),
            date: d
                .scheduled_for
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            customer: d.customer.clone(),
            product: d.product.clone(),
            status: d.status.to_string(),
            address: d.address.clone(),
        }
    }
}

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Read")]
    read: bool,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Arc<Notification>> for NotificationRow {
    fn from(n: &Arc<Notification>) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.to_string(),
            title: n.title.clone(),
            read: n.is_read,
            created: short_time(n.created_at),
        }
    }
}

fn short_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

// ── Shared flow ─────────────────────────────────────────────────────

fn search(args: &ListOnlyArgs) -> &SearchArgs {
    match &args.command {
        ListOnlyCommand::List(search) => search,
    }
}

fn page_of<T: Searchable + Clone>(
    items: &[T],
    args: &SearchArgs,
    page_size: usize,
) -> ListPage<T> {
    let window = PageWindow::new(args.page, args.page_size.unwrap_or(page_size));
    search_page(items, args.search.as_deref().unwrap_or_default(), window)
}

fn print_page<T, R>(
    page: &ListPage<Arc<T>>,
    global: &GlobalOpts,
    to_row: impl Fn(&Arc<T>) -> R,
) where
    T: serde::Serialize + Entity,
    R: Tabled,
{
    let out = output::render_list(&global.output, &page.rows, to_row, |item| {
        item.id().to_string()
    });
    output::print_output(&out, global.quiet);
    output::print_page_footer(
        &global.output,
        page.page,
        page.total_pages,
        page.matched,
        global.quiet,
    );
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn categories(
    controller: &Controller,
    args: ListOnlyArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    util::fetch(controller, EntityKind::Categories, global.quiet).await?;
    let snap = controller.store().categories_snapshot();
    let page = page_of(snap.as_slice(), search(&args), page_size);
    print_page(&page, global, |x| CategoryRow::from(x));
    Ok(())
}

pub async fn users(
    controller: &Controller,
    args: ListOnlyArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    util::fetch(controller, EntityKind::Users, global.quiet).await?;
    let snap = controller.store().users_snapshot();
    let page = page_of(snap.as_slice(), search(&args), page_size);
    print_page(&page, global, |x| UserRow::from(x));
    Ok(())
}

pub async fn service_requests(
    controller: &Controller,
    args: ListOnlyArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    util::fetch(controller, EntityKind::ServiceRequests, global.quiet).await?;
    let snap = controller.store().service_requests_snapshot();
    let page = page_of(snap.as_slice(), search(&args), page_size);
    print_page(&page, global, |x| ServiceRequestRow::from(x));
    Ok(())
}

pub async fn deliveries(
    controller: &Controller,
    args: ListOnlyArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    util::fetch(controller, EntityKind::Deliveries, global.quiet).await?;
    let snap = controller.store().deliveries_snapshot();
    let page = page_of(snap.as_slice(), search(&args), page_size);
    print_page(&page, global, |x| DeliveryRow::from(x));
    Ok(())
}

pub async fn notifications(
    controller: &Controller,
    args: ListOnlyArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    util::fetch(controller, EntityKind::Notifications, global.quiet).await?;
    let snap = controller.store().notifications_snapshot();
    let page = page_of(snap.as_slice(), search(&args), page_size);
    print_page(&page, global, |x| NotificationRow::from(x));
    Ok(())
}
