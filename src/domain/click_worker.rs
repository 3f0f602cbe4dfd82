//! Background worker applying click increments.
//!
//! Consumes [`ClickEvent`]s from the bounded channel and issues the atomic
//! `click_count + 1` update. The worker task is spawned detached at startup,
//! so a cancelled request can never cancel an increment that was already
//! queued. Failures are logged and counted, never retried: the redirect that
//! triggered the event has long since been answered.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
) {
    while let Some(ev) = rx.recv().await {
        match repository.increment_clicks(&ev.code).await {
            Ok(()) => {
                counter!("clicks_recorded_total").increment(1);
            }
            Err(e) => {
                counter!("clicks_failed_total").increment(1);
                warn!("Failed to record click for {}: {}", ev.code, e);
            }
        }
    }
}
