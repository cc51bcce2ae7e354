//! Persistence writer: delivers outbound writes to a store with retry.
//!
//! Runs on its own thread so a slow or failing store never stalls the game
//! loop. Failed writes are retried with exponential backoff and dropped
//! after the configured number of attempts. Local state is never rolled back.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use decolagem_core::persist::OutboundWrite;

use crate::config::RetryPolicy;
use crate::store::GameStore;

/// Idle wait when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Messages for the writer thread.
#[derive(Debug)]
pub enum WriterCommand {
    Write(OutboundWrite),
    /// Make one last attempt at everything pending, then exit.
    Shutdown,
}

#[derive(Debug)]
struct PendingWrite {
    write: OutboundWrite,
    attempts: u32,
    due: Instant,
}

/// Outcome of one delivery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub retrying: usize,
    pub dropped: usize,
}

/// Writes waiting for delivery, in arrival order.
#[derive(Debug)]
pub struct WriteQueue {
    policy: RetryPolicy,
    user_id: String,
    pending: VecDeque<PendingWrite>,
}

impl WriteQueue {
    pub fn new(policy: RetryPolicy, user_id: impl Into<String>) -> Self {
        Self {
            policy,
            user_id: user_id.into(),
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, write: OutboundWrite, now: Instant) {
        self.pending.push_back(PendingWrite {
            write,
            attempts: 0,
            due: now,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest time a pending write is due.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Attempt every write due at `now`.
    pub fn process(&mut self, store: &mut dyn GameStore, now: Instant) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut remaining = VecDeque::with_capacity(self.pending.len());

        while let Some(mut pending) = self.pending.pop_front() {
            if pending.due > now {
                remaining.push_back(pending);
                continue;
            }
            let path = pending.write.endpoint().path(&self.user_id);
            match store.apply(&pending.write) {
                Ok(()) => {
                    log::debug!("POST {} ({}) delivered", path, pending.write.key);
                    report.delivered += 1;
                }
                Err(err) => {
                    pending.attempts += 1;
                    if pending.attempts >= self.policy.max_attempts {
                        log::error!(
                            "POST {} ({}) dropped after {} attempts: {}",
                            path,
                            pending.write.key,
                            pending.attempts,
                            err
                        );
                        report.dropped += 1;
                    } else {
                        let backoff = self.policy.backoff_ms(pending.attempts);
                        log::warn!(
                            "POST {} ({}) failed: {}; retrying in {} ms",
                            path,
                            pending.write.key,
                            err,
                            backoff
                        );
                        pending.due = now + Duration::from_millis(backoff);
                        report.retrying += 1;
                        remaining.push_back(pending);
                    }
                }
            }
        }

        self.pending = remaining;
        report
    }

    /// Attempt everything once regardless of backoff; give up on failures.
    pub fn flush(&mut self, store: &mut dyn GameStore) -> DeliveryReport {
        for pending in self.pending.iter_mut() {
            pending.attempts = pending.attempts.max(self.policy.max_attempts.saturating_sub(1));
        }
        self.process(store, Instant::now() + Duration::from_secs(3600))
    }
}

/// Spawns the writer in a new thread.
///
/// Returns the sender the game loop forwards writes to.
pub fn spawn_writer(
    mut store: Box<dyn GameStore>,
    policy: RetryPolicy,
    user_id: String,
) -> std::io::Result<(mpsc::Sender<WriterCommand>, JoinHandle<()>)> {
    let (tx, rx) = mpsc::channel::<WriterCommand>();
    let handle = std::thread::Builder::new()
        .name("decolagem-writer".into())
        .spawn(move || {
            let mut queue = WriteQueue::new(policy, user_id);
            run_writer(&mut queue, store.as_mut(), &rx);
        })?;
    Ok((tx, handle))
}

/// The writer loop. Runs until Shutdown or channel disconnect.
fn run_writer(
    queue: &mut WriteQueue,
    store: &mut dyn GameStore,
    rx: &mpsc::Receiver<WriterCommand>,
) {
    loop {
        let wait = queue
            .next_due()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        match rx.recv_timeout(wait) {
            Ok(WriterCommand::Write(write)) => queue.push(write, Instant::now()),
            Ok(WriterCommand::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                while let Ok(WriterCommand::Write(write)) = rx.try_recv() {
                    queue.push(write, Instant::now());
                }
                let report = queue.flush(store);
                log::info!(
                    "writer stopped: {} delivered, {} dropped",
                    report.delivered,
                    report.dropped
                );
                return;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        queue.process(store, Instant::now());
    }
}
