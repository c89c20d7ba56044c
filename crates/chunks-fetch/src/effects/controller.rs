//! The task that owns a running pipeline's state.
//!
//! Fetch tasks and the pipeline handle talk to the controller over a single
//! channel, so completions and commands are handled one at a time in arrival
//! order and no state is shared.

use std::sync::Arc;

use chunks_packet::{Data, Interest, Name};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::core::{ChainVerifier, FailureOutcome, FetchId, NextRequest, Submitted, Verified, Window};
use crate::data::{PipelineEvent, PipelineOptions, Segment, Summary};
use crate::effects::face::Face;
use crate::effects::fetcher::SegmentFetcher;
use crate::error::{FetchFailure, PipelineError};

pub(crate) enum Message {
    Completed(Completion),
    Cancel(oneshot::Sender<()>),
}

pub(crate) struct Completion {
    slot:     usize,
    fetch_id: FetchId,
    segment:  u64,
    outcome:  Result<Data, FetchFailure>,
}

#[must_use]
enum Flow {
    Continue,
    Stop,
}

pub(crate) struct Controller<F> {
    face:     Arc<F>,
    prefix:   Name,
    options:  PipelineOptions,
    window:   Window,
    verifier: ChainVerifier,
    tasks:    Vec<Option<JoinHandle<()>>>,
    inbox:    mpsc::UnboundedReceiver<Message>,
    outbox:   mpsc::UnboundedSender<Message>,
    events:   mpsc::UnboundedSender<PipelineEvent>,
    bytes:    u64,
}

impl<F: Face> Controller<F> {
    pub(crate) fn new(
        face: Arc<F>,
        prefix: Name,
        options: PipelineOptions,
        inbox: mpsc::UnboundedReceiver<Message>,
        outbox: mpsc::UnboundedSender<Message>,
        events: mpsc::UnboundedSender<PipelineEvent>,
    ) -> Self {
        let size = options.window_size;
        Self {
            face,
            prefix,
            options,
            window: Window::new(size),
            verifier: ChainVerifier::new(),
            tasks: (0..size).map(|_| None).collect(),
            inbox,
            outbox,
            events,
            bytes: 0,
        }
    }

    pub(crate) async fn run(mut self) {
        let started = Instant::now();
        debug!(window = self.window.size(), retries = %self.options.max_retries, "starting pipeline");

        if let Flow::Stop = self.fill() {
            return;
        }

        while let Some(message) = self.inbox.recv().await {
            match message {
                Message::Cancel(ack) => {
                    self.abort_all();
                    debug!("pipeline canceled");
                    let _ = ack.send(());
                    return;
                }
                Message::Completed(completion) => {
                    if let Flow::Stop = self.on_completion(completion, started) {
                        return;
                    }
                }
            }

            if self.window.running() == 0 {
                let next = self.verifier.next_segment();
                let _ = self.fail(PipelineError::Stalled { next });
                return;
            }
        }
    }

    fn fill(&mut self) -> Flow {
        for slot in 0..self.window.size() {
            match self.window.next_request() {
                NextRequest::Issue(segment) => self.issue(slot, segment),
                NextRequest::Exhausted => break,
                NextRequest::Abort(error) => return self.fail(error),
            }
        }
        Flow::Continue
    }

    fn refill(&mut self, slot: usize) -> Flow {
        match self.window.next_request() {
            NextRequest::Issue(segment) => {
                self.issue(slot, segment);
                Flow::Continue
            }
            NextRequest::Exhausted => Flow::Continue,
            NextRequest::Abort(error) => self.fail(error),
        }
    }

    fn issue(&mut self, slot: usize, segment: u64) {
        let interest = Interest::new(self.prefix.clone().append_segment(segment))
            .can_be_prefix(false)
            .must_be_fresh(self.options.must_be_fresh)
            .lifetime(self.options.interest_lifetime);
        let fetch_id = self.window.bind(slot, segment);
        let fetcher = SegmentFetcher::new(Arc::clone(&self.face), interest, self.options.max_retries);
        let outbox = self.outbox.clone();

        debug!(segment, slot, "requesting segment");
        let task = tokio::spawn(async move {
            let outcome = fetcher.run().await;
            let _ = outbox.send(Message::Completed(Completion { slot, fetch_id, segment, outcome }));
        });
        if let Some(previous) = self.tasks[slot].replace(task) {
            previous.abort();
        }
    }

    fn on_completion(&mut self, completion: Completion, started: Instant) -> Flow {
        let Completion { slot, fetch_id, segment, outcome } = completion;
        if !self.window.is_current(slot, fetch_id) {
            trace!(segment, slot, "dropping stale completion");
            return Flow::Continue;
        }
        self.tasks[slot] = None;

        match outcome {
            Ok(data) => self.on_data(slot, segment, data, started),
            Err(failure) => {
                warn!(segment, slot, error = %failure, "segment request failed");
                match self.window.on_failure(slot, failure) {
                    FailureOutcome::Fatal(error) => self.fail(error),
                    FailureOutcome::Continue { canceled } => {
                        self.abort(&canceled);
                        Flow::Continue
                    }
                }
            }
        }
    }

    fn on_data(&mut self, slot: usize, segment: u64, data: Data, started: Instant) -> Flow {
        self.window.mark_succeeded(slot);
        let declared_final = data.final_segment();
        debug!(segment, slot, final_segment = ?declared_final, "received segment");

        let Submitted { verified, error } = self.verifier.submit(segment, data);
        for segment in verified {
            if let Flow::Stop = self.deliver(segment) {
                return Flow::Stop;
            }
        }
        if let Some(error) = error {
            return self.fail(error);
        }

        if let Some(last) = declared_final
            && self.window.final_segment().is_none()
        {
            match self.window.learn_final(last) {
                Ok(canceled) => {
                    debug!(final_segment = last, canceled = canceled.len(), "final segment discovered");
                    self.abort(&canceled);
                    self.verifier.discard_beyond(last);
                }
                Err(error) => return self.fail(error),
            }
        }

        if self
            .window
            .final_segment()
            .is_some_and(|last| self.verifier.next_segment() > last)
        {
            return self.complete(started);
        }
        self.refill(slot)
    }

    fn deliver(&mut self, verified: Verified) -> Flow {
        self.bytes += verified.payload.len() as u64;
        trace!(segment = verified.segment, bytes = verified.payload.len(), "delivering segment");

        let event = PipelineEvent::Segment(Segment {
            number:  verified.segment,
            payload: verified.payload,
            data:    verified.data,
        });
        if self.events.send(event).is_err() {
            debug!("event receiver dropped, stopping pipeline");
            self.abort_all();
            return Flow::Stop;
        }
        Flow::Continue
    }

    fn complete(&mut self, started: Instant) -> Flow {
        self.abort_all();
        let summary = Summary {
            segments: self.verifier.next_segment(),
            bytes:    self.bytes,
            elapsed:  started.elapsed(),
        };
        info!(prefix = %self.prefix, %summary, "all segments received");
        let _ = self.events.send(PipelineEvent::Completed(summary));
        Flow::Stop
    }

    fn fail(&mut self, error: PipelineError) -> Flow {
        warn!(prefix = %self.prefix, %error, "pipeline failed");
        self.abort_all();
        let _ = self.events.send(PipelineEvent::Failed(error));
        Flow::Stop
    }

    fn abort(&mut self, slots: &[usize]) {
        for &slot in slots {
            if let Some(task) = self.tasks[slot].take() {
                task.abort();
            }
        }
    }

    fn abort_all(&mut self) {
        self.window.cancel_all();
        for task in self.tasks.iter_mut().filter_map(Option::take) {
            task.abort();
        }
    }
}

impl<F> Drop for Controller<F> {
    fn drop(&mut self) {
        for task in self.tasks.iter_mut().filter_map(Option::take) {
            task.abort();
        }
    }
}
