//! Data bridge — connects the [`Controller`] store to TUI actions.
//!
//! Runs as a background task: forwards every product snapshot and
//! fetch-status change as an [`Action`], and refetches whenever the app
//! asks for it over the refresh channel.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sirs_core::{Controller, EntityKind, FetchStatus};

use crate::action::Action;

/// Push the current snapshot, fetch once, then loop until cancelled.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
) {
    let mut products = controller.store().subscribe_products();
    let mut status = controller.store().subscribe_fetch_status();

    let _ = action_tx.send(Action::ProductsUpdated(
        products.borrow_and_update().clone(),
    ));

    refresh(&controller, &action_tx).await;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = products.changed() => {
                let snap = products.borrow_and_update().clone();
                debug!(count = snap.len(), "dispatching ProductsUpdated");
                let _ = action_tx.send(Action::ProductsUpdated(snap));
            }
            Ok(()) = status.changed() => {
                let current = status.borrow_and_update().clone();
                let _ = action_tx.send(Action::FetchStatusChanged(current));
            }
            Some(()) = refresh_rx.recv() => {
                // Collapse a burst of requests into one fetch
                while refresh_rx.try_recv().is_ok() {}
                refresh(&controller, &action_tx).await;
            }
        }
    }

    debug!("data bridge stopped");
}

/// One product fetch. Failures reach the app through the store's fetch
/// status; a failed login never touches the store, so it is reported
/// directly.
async fn refresh(controller: &Controller, action_tx: &mpsc::UnboundedSender<Action>) {
    let _ = action_tx.send(Action::FetchStarted);

    if let Err(e) = controller.ensure_session().await {
        warn!(error = %e, "login failed");
        let _ = action_tx.send(Action::FetchStatusChanged(FetchStatus::Failed {
            message: e.to_string(),
            at: Utc::now(),
        }));
        return;
    }

    if let Err(e) = controller.refresh(EntityKind::Products).await {
        debug!(error = %e, "product refresh failed");
    }
}
