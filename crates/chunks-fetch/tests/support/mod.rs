//! A face whose Interests are answered by the test, one at a time.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use chunks_fetch::{EventStream, Face, InterestError, PipelineEvent, Segment};
use chunks_packet::{Data, Interest, Name};
use chunks_verify::{FinalMarker, seal_chain, split_payload};
use tokio::sync::{mpsc, oneshot};

const WAIT: Duration = Duration::from_secs(5);

pub fn prefix() -> Name { "/test/content/v=1".parse().unwrap() }

/// `segments` chained segments of 4 bytes each.
pub fn chain(segments: usize, marker: FinalMarker) -> Vec<Data> {
    let payload: Vec<u8> = (0..segments * 4).map(|i| i as u8).collect();
    seal_chain(&prefix(), split_payload(&payload, 4), marker)
}

pub struct Request {
    pub interest: Interest,
    reply:        oneshot::Sender<Result<Data, InterestError>>,
}

impl Request {
    pub fn segment(&self) -> u64 { self.interest.name.segment().expect("segment name") }

    pub fn reply(self, outcome: Result<Data, InterestError>) { let _ = self.reply.send(outcome); }

    /// Resolves once the requester stopped waiting for an answer.
    pub async fn abandoned(&mut self) {
        tokio::time::timeout(WAIT, self.reply.closed())
            .await
            .expect("request was never abandoned");
    }
}

pub struct ScriptedFace {
    requests: mpsc::UnboundedSender<Request>,
    active:   AtomicUsize,
    peak:     AtomicUsize,
}

impl ScriptedFace {
    pub fn peak(&self) -> usize { self.peak.load(Ordering::SeqCst) }
}

struct Active<'a>(&'a ScriptedFace);

impl<'a> Active<'a> {
    fn enter(face: &'a ScriptedFace) -> Self {
        let now = face.active.fetch_add(1, Ordering::SeqCst) + 1;
        face.peak.fetch_max(now, Ordering::SeqCst);
        Self(face)
    }
}

impl Drop for Active<'_> {
    fn drop(&mut self) { self.0.active.fetch_sub(1, Ordering::SeqCst); }
}

impl Face for ScriptedFace {
    async fn express_interest(&self, interest: Interest) -> Result<Data, InterestError> {
        let _active = Active::enter(self);
        let (reply, answer) = oneshot::channel();
        if self.requests.send(Request { interest, reply }).is_err() {
            return Err(InterestError::Timeout);
        }
        answer.await.unwrap_or(Err(InterestError::Timeout))
    }
}

/// The test's side of a [`ScriptedFace`].
pub struct Network {
    requests: mpsc::UnboundedReceiver<Request>,
    parked:   Vec<Request>,
    seen:     Vec<u64>,
}

pub fn scripted() -> (Arc<ScriptedFace>, Network) {
    let (requests, receiver) = mpsc::unbounded_channel();
    let face = ScriptedFace {
        requests,
        active: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    };
    let network = Network { requests: receiver, parked: Vec::new(), seen: Vec::new() };
    (Arc::new(face), network)
}

impl Network {
    /// The oldest unanswered request for `segment`, waiting for it if needed.
    pub async fn take(&mut self, segment: u64) -> Request {
        if let Some(position) = self.parked.iter().position(|r| r.segment() == segment) {
            return self.parked.remove(position);
        }
        loop {
            let request = tokio::time::timeout(WAIT, self.requests.recv())
                .await
                .unwrap_or_else(|_| panic!("no request for segment {segment}"))
                .expect("face dropped");
            self.seen.push(request.segment());
            if request.segment() == segment {
                return request;
            }
            self.parked.push(request);
        }
    }

    /// Segment numbers of every request expressed so far, in order.
    pub fn requested(&mut self) -> Vec<u64> {
        while let Ok(request) = self.requests.try_recv() {
            self.seen.push(request.segment());
            self.parked.push(request);
        }
        self.seen.clone()
    }
}

pub async fn next_event(events: &mut EventStream) -> Option<PipelineEvent> {
    tokio::time::timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for a pipeline event")
}

/// Read events up to and including the terminal one.
pub async fn run_to_end(events: &mut EventStream) -> (Vec<Segment>, PipelineEvent) {
    let mut segments = Vec::new();
    loop {
        let event = next_event(events).await.expect("event stream ended early");
        if event.is_terminal() {
            return (segments, event);
        }
        if let PipelineEvent::Segment(segment) = event {
            segments.push(segment);
        }
    }
}

pub fn numbers(segments: &[Segment]) -> Vec<u64> { segments.iter().map(|s| s.number).collect() }

pub fn joined(segments: &[Segment]) -> Bytes {
    segments.iter().flat_map(|s| s.payload.iter().copied()).collect()
}
