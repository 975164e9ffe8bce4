use crate::config::AdapterWait;
use crate::error::TransportError;
use crate::screen::{Action, Effect};
use crate::transport::Transport;
use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

// Messages accepted by the worker thread
enum Job {
    Run(Effect),
    Shutdown,
}

/// Handle to the thread that owns the transport. Effects are executed strictly
/// in submission order, one at a time.
pub struct LinkWorker {
    jobs: Sender<Job>,
    outcomes: Receiver<Action>,
    handle: Option<JoinHandle<()>>,
    in_flight: usize, // Submitted effects whose outcome has not been received yet
}

impl LinkWorker {
    pub fn spawn(transport: Box<dyn Transport>, wait: AdapterWait) -> Self {
        log::info!("Spawning link worker thread...");
        let (job_tx, job_rx) = mpsc::channel();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("link-worker".to_string())
            .spawn(move || run_link_worker_loop(transport, wait, job_rx, outcome_tx));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Jobs will fail to send and be logged, the UI keeps running
                log::error!("Failed to spawn link worker thread: {}", e);
                None
            }
        };

        Self {
            jobs: job_tx,
            outcomes: outcome_rx,
            handle,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            log::debug!("Submitting {:?} to link worker.", effect);
            match self.jobs.send(Job::Run(effect)) {
                Ok(()) => self.in_flight += 1,
                Err(e) => log::error!("Link worker is gone, dropping job: {:?}", effect_of(e.0)),
            }
        }
    }

    /// Number of submitted effects still waiting for their outcome.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Next outcome if one is ready.
    pub fn try_next(&mut self) -> Option<Action> {
        let action = self.outcomes.try_recv().ok()?;
        self.account(&action);
        Some(action)
    }

    /// Waits up to `timeout` for the next outcome.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<Action> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(action) => {
                self.account(&action);
                Some(action)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    // Adapter notifications arrive unrequested and do not settle a job
    fn account(&mut self, action: &Action) {
        if !matches!(action, Action::AdapterDisabled) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }

    /// Stops the loop after the jobs already queued and joins the thread.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        log::info!("Signaling link worker to stop.");
        if self.jobs.send(Job::Shutdown).is_err() {
            log::warn!("Link worker already exited.");
        }
        if handle.join().is_err() {
            log::error!("Link worker thread panicked.");
        }
        log::info!("Link worker stopped.");
    }
}

impl LinkWorker {
    /// Signals the loop to stop without waiting for it. The thread exits
    /// once the job it is running returns.
    pub fn detach(&mut self) {
        if self.handle.take().is_none() {
            return;
        }
        log::warn!("Leaving link worker to finish in the background.");
        if self.jobs.send(Job::Shutdown).is_err() {
            log::warn!("Link worker already exited.");
        }
    }
}

impl Drop for LinkWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn effect_of(job: Job) -> Option<Effect> {
    match job {
        Job::Run(effect) => Some(effect),
        Job::Shutdown => None,
    }
}

// The core worker loop logic
fn run_link_worker_loop(
    mut transport: Box<dyn Transport>,
    wait: AdapterWait,
    jobs: Receiver<Job>,
    outcomes: Sender<Action>,
) {
    log::info!("Link worker loop starting.");

    // Held for the life of the loop, released on exit
    let notifier = outcomes.clone();
    let subscription = transport.subscribe_adapter_disabled(Box::new(move || {
        if notifier.send(Action::AdapterDisabled).is_err() {
            log::debug!("Adapter disabled with nobody listening.");
        }
    }));
    let subscription = match subscription {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            log::warn!("Could not watch adapter power state: {}", e);
            None
        }
    };

    while let Ok(job) = jobs.recv() {
        let effect = match job {
            Job::Run(effect) => effect,
            Job::Shutdown => {
                log::info!("Stop signal received, exiting link worker loop.");
                break;
            }
        };

        let outcome = execute(transport.as_mut(), effect, wait);
        if outcomes.send(outcome).is_err() {
            log::info!("Outcome receiver dropped, exiting link worker loop.");
            break;
        }
    }

    drop(subscription);
    log::info!("Link worker cleanup complete. Exiting.");
    // Transport is dropped here, closing any open link.
}

/// Runs one effect against the transport and reports its outcome.
pub fn execute(transport: &mut dyn Transport, effect: Effect, wait: AdapterWait) -> Action {
    match effect {
        Effect::ListDevices => Action::DevicesListed(transport.list()),
        Effect::QueryAdapter => Action::AdapterStatus(transport.is_enabled()),
        Effect::EnableAdapter => Action::AdapterEnabled(enable_and_wait(transport, wait)),
        Effect::Connect { ticket, id } => {
            log::info!("Opening link to {}...", id);
            Action::ConnectFinished {
                ticket,
                result: transport.connect(&id),
            }
        }
        Effect::Disconnect { ticket } => Action::DisconnectFinished {
            ticket,
            result: transport.disconnect(),
        },
        Effect::Write(payload) => {
            let result = transport.write(&payload);
            match &result {
                Ok(()) => log::debug!("Wrote {:?}.", payload),
                Err(e) => log::warn!("Error writing {:?}: {}", payload, e),
            }
            Action::WriteFinished { payload, result }
        }
    }
}

/// Requests power-on, then polls until the adapter reports enabled or
/// `wait.timeout` elapses.
pub fn enable_and_wait(transport: &mut dyn Transport, wait: AdapterWait) -> Result<(), TransportError> {
    transport.enable()?;
    let started = Instant::now();
    loop {
        match transport.is_enabled() {
            Ok(true) => {
                log::info!("Adapter enabled after {:?}.", started.elapsed());
                return Ok(());
            }
            Ok(false) => log::trace!("Adapter not powered yet."),
            Err(e) => log::debug!("Polling adapter state failed: {}", e),
        }
        if started.elapsed() >= wait.timeout {
            return Err(TransportError::EnableTimeout(wait.timeout));
        }
        thread::sleep(wait.poll_interval);
    }
}
