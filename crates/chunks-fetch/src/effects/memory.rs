use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chunks_packet::{Data, Interest, NackReason, Name};

use crate::effects::face::{Face, InterestError};

/// A failure to play back instead of answering an Interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Stay silent until the Interest's lifetime expires.
    Timeout,
    Nack(NackReason),
}

/// Serves a fixed set of Data packets by exact name.
///
/// Unknown names are answered with a `NoRoute` Nack. Faults injected for a
/// name are played back, one per Interest, before that name is served.
#[derive(Debug, Default)]
pub struct MemoryFace {
    packets:   HashMap<Name, Data>,
    faults:    Mutex<HashMap<Name, VecDeque<Fault>>>,
    expressed: Mutex<Vec<Interest>>,
    delay:     Duration,
}

impl MemoryFace {
    pub fn new() -> Self { Self::default() }

    /// Serve every packet in `packets` under its own name.
    pub fn serving(packets: impl IntoIterator<Item = Data>) -> Self {
        let mut face = Self::new();
        for data in packets {
            face.insert(data);
        }
        face
    }

    pub fn insert(&mut self, data: Data) { self.packets.insert(data.name.clone(), data); }

    /// Answer every Interest only after `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue `fault` for the next Interest carrying `name`.
    pub fn inject(&self, name: Name, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push_back(fault);
    }

    /// Every Interest expressed so far, in order.
    pub fn expressed(&self) -> Vec<Interest> {
        self.expressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_fault(&self, name: &Name) -> Option<Fault> {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(name)
            .and_then(VecDeque::pop_front)
    }
}

impl Face for MemoryFace {
    async fn express_interest(&self, interest: Interest) -> Result<Data, InterestError> {
        self.expressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interest.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.next_fault(&interest.name) {
            Some(Fault::Timeout) => {
                tokio::time::sleep(interest.lifetime).await;
                return Err(InterestError::Timeout);
            }
            Some(Fault::Nack(reason)) => return Err(InterestError::Nack(reason)),
            None => {}
        }

        self.packets
            .get(&interest.name)
            .cloned()
            .ok_or(InterestError::Nack(NackReason::NoRoute))
    }
}
