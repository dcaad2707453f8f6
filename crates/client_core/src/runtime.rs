//! Runs stylization jobs off the controller's thread of control and feeds
//! their outcomes back as they complete.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    client::Stylizer,
    controller::{JobOutcome, RequestState, StudioController, StylizeJob},
};

pub struct StylizeDispatcher {
    stylizer: Arc<dyn Stylizer>,
    outcomes_tx: mpsc::UnboundedSender<JobOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<JobOutcome>,
    tasks: Vec<JoinHandle<()>>,
}

impl StylizeDispatcher {
    pub fn new(stylizer: Arc<dyn Stylizer>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            stylizer,
            outcomes_tx,
            outcomes_rx,
            tasks: Vec::new(),
        }
    }

    /// Spawns `job` on the current tokio runtime.
    pub fn dispatch(&mut self, job: StylizeJob) {
        let stylizer = Arc::clone(&self.stylizer);
        let outcomes_tx = self.outcomes_tx.clone();
        let request_id = job.ticket.request_id;

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            let outcome = job.run(stylizer.as_ref()).await;
            if outcomes_tx.send(outcome).is_err() {
                debug!(request_id, "dispatcher: outcome dropped, receiver gone");
            }
        }));
    }

    pub async fn next_outcome(&mut self) -> Option<JobOutcome> {
        self.outcomes_rx.recv().await
    }

    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for StylizeDispatcher {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Submits through `controller` and waits until the request it issued is
/// resolved. Stale outcomes that arrive first are discarded by the
/// controller.
pub async fn submit_and_wait<'a>(
    controller: &'a mut StudioController,
    dispatcher: &mut StylizeDispatcher,
) -> &'a RequestState {
    if let Some(job) = controller.submit() {
        dispatcher.dispatch(job);
        while controller.state().is_in_flight() {
            let Some(outcome) = dispatcher.next_outcome().await else {
                break;
            };
            controller.resolve(outcome);
        }
    }
    controller.state()
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
