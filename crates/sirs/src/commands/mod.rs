//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod lists;
pub mod products;
pub mod session;
pub mod util;

use sirs_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    match cmd {
        Command::Products(args) => products::handle(controller, args, global, page_size).await,
        Command::Categories(args) => lists::categories(controller, args, global, page_size).await,
        Command::Users(args) => lists::users(controller, args, global, page_size).await,
        Command::ServiceRequests(args) => {
            lists::service_requests(controller, args, global, page_size).await
        }
        Command::Deliveries(args) => lists::deliveries(controller, args, global, page_size).await,
        Command::Notifications(args) => {
            lists::notifications(controller, args, global, page_size).await
        }
        // Handled before dispatch
        Command::Login | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
