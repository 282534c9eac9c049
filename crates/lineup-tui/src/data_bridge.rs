//! Data bridge: forwards session snapshots into the action channel.
//!
//! Also performs the initial loads, so the first frames render while the
//! line list is still on its way.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use lineup_core::LineId;

use crate::action::Action;
use crate::app::Session;

pub async fn spawn_data_bridge(
    session: Session,
    initial_line: Option<LineId>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshots = session.subscribe().into_stream();

    let loader = {
        let session = session.clone();
        let action_tx = action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = session.load_lines().await {
                warn!(error = %e, "initial line list failed");
                let _ = action_tx.send(Action::Notify(e.user_message().into()));
                return;
            }
            if let Some(line) = initial_line {
                let _ = action_tx.send(Action::OpenLine(line));
            }
        })
    };

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            next = snapshots.next() => {
                let Some(snapshot) = next else { break };
                if action_tx.send(Action::SnapshotUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    loader.abort();
    session.close().await;
    debug!("data bridge shut down");
}
