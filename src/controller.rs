use crate::config::AdapterWait;
use crate::link_worker::LinkWorker;
use crate::screen::{Action, Screen};
use crate::transport::Transport;
use std::time::{Duration, Instant};

/// Pairs the screen state with the worker that carries out its effects.
pub struct Controller {
    screen: Screen,
    worker: LinkWorker,
}

impl Controller {
    pub fn new(transport: Box<dyn Transport>, wait: AdapterWait) -> Self {
        Self {
            screen: Screen::new(),
            worker: LinkWorker::spawn(transport, wait),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Applies `action` and queues whatever transport work it asks for.
    pub fn dispatch(&mut self, action: Action) {
        log::trace!("Dispatching {:?}", action);
        let effects = self.screen.update(action);
        self.worker.submit(effects);
    }

    /// Feeds every outcome that is already available back into the screen.
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.worker.try_next() {
            self.dispatch(outcome);
            applied += 1;
        }
        applied
    }

    /// Blocks until no submitted work is left or `timeout` passes.
    /// Returns `true` if the worker went idle in time.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            while self.worker.pending() > 0 {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return false;
                }
                if let Some(outcome) = self.worker.next_timeout(remaining) {
                    self.dispatch(outcome);
                }
            }
            // Unrequested notifications may have queued more work
            if self.pump() == 0 && self.worker.pending() == 0 {
                return true;
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.worker.shutdown();
    }

    /// Stops the worker without joining it, for when a transport call is stuck.
    pub fn detach(&mut self) {
        self.worker.detach();
    }
}
