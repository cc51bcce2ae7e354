//! Outbound write queue.
//!
//! The engine only records what must be persisted; delivery, retry and
//! backoff belong to whoever drains the queue.

use decolagem_core::persist::{OutboundWrite, WriteKey, WritePayload};

/// Writes waiting to be delivered, keyed by a monotonic sequence number.
#[derive(Debug, Default)]
pub struct Outbox {
    next_seq: u64,
    pending: Vec<OutboundWrite>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `seq`, e.g. the last key a store applied
    /// for this team in an earlier session.
    pub fn resume_after(&mut self, seq: u64) {
        self.next_seq = self.next_seq.max(seq);
    }

    /// Queue a write for `game_number`/`team`.
    pub fn push(&mut self, game_number: u32, team: &str, payload: WritePayload) -> WriteKey {
        self.next_seq += 1;
        let key = WriteKey {
            game_number,
            team: team.to_string(),
            seq: self.next_seq,
        };
        log::debug!("queued {:?} write {}", payload.endpoint(), key);
        self.pending.push(OutboundWrite {
            key: key.clone(),
            payload,
        });
        key
    }

    /// Take every queued write, oldest first.
    pub fn drain(&mut self) -> Vec<OutboundWrite> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
