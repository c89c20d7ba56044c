use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chunks_packet::Name;
use futures_util::Stream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::data::{PipelineEvent, PipelineOptions};
use crate::effects::controller::{Controller, Message};
use crate::effects::face::Face;
use crate::error::Result;

/// A strategy for retrieving every segment under a prefix.
///
/// Implementations report progress through the [`EventStream`] handed out
/// at construction.
pub trait Pipeline {
    /// Begin fetching. Must be called within a Tokio runtime; calling it on a
    /// pipeline that is already running or has stopped does nothing.
    fn start(&mut self);

    /// Stop fetching and cancel every outstanding request.
    ///
    /// Safe in any state. Once the returned future resolves the pipeline
    /// emits no further events and its event stream ends.
    fn cancel(&mut self) -> impl Future<Output = ()> + Send;
}

enum Stage<F> {
    Idle(Controller<F>),
    Running(JoinHandle<()>),
    Stopped,
}

/// Keeps a fixed number of segment requests in flight.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use chunks_fetch::{FixedPipeline, MemoryFace, Pipeline, PipelineEvent, PipelineOptions};
///
/// # async fn run(face: Arc<MemoryFace>) -> chunks_fetch::Result<()> {
/// let options = PipelineOptions::default().window_size(8);
/// let (mut pipeline, mut events) = FixedPipeline::new(face, "/videos/v=1".parse().unwrap(), options)?;
/// pipeline.start();
/// while let Some(event) = events.recv().await {
///     if let PipelineEvent::Segment(segment) = event {
///         println!("segment {} ({} bytes)", segment.number, segment.payload.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct FixedPipeline<F> {
    prefix:  Name,
    control: mpsc::UnboundedSender<Message>,
    stage:   Stage<F>,
}

impl<F: Face> FixedPipeline<F> {
    /// Create a pipeline fetching `prefix/seg=0 ..` through `face`.
    pub fn new(
        face: Arc<F>,
        prefix: Name,
        options: PipelineOptions,
    ) -> Result<(Self, EventStream)> {
        options.validate()?;

        let (control, inbox) = mpsc::unbounded_channel();
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Controller::new(face, prefix.clone(), options, inbox, control.clone(), events);

        let pipeline = Self { prefix, control, stage: Stage::Idle(controller) };
        Ok((pipeline, EventStream { receiver }))
    }

    pub fn prefix(&self) -> &Name { &self.prefix }

    pub fn is_running(&self) -> bool {
        matches!(&self.stage, Stage::Running(task) if !task.is_finished())
    }
}

impl<F: Face> Pipeline for FixedPipeline<F> {
    fn start(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Stopped) {
            Stage::Idle(controller) => {
                let span = tracing::info_span!("fixed_pipeline", prefix = %self.prefix);
                self.stage = Stage::Running(tokio::spawn(controller.run().instrument(span)));
            }
            other => self.stage = other,
        }
    }

    async fn cancel(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Stopped) {
            Stage::Running(task) => {
                let (ack, acked) = oneshot::channel();
                if self.control.send(Message::Cancel(ack)).is_ok() {
                    let _ = acked.await;
                }
                let _ = task.await;
            }
            // dropping an idle controller closes the event stream
            Stage::Idle(_) | Stage::Stopped => {}
        }
    }
}

impl<F> Drop for FixedPipeline<F> {
    fn drop(&mut self) {
        if let Stage::Running(task) = &self.stage {
            task.abort();
        }
    }
}

/// Events emitted by a pipeline, in order.
///
/// Ends after the terminal event, or once the pipeline is canceled.
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<PipelineEvent>,
}

impl EventStream {
    pub async fn recv(&mut self) -> Option<PipelineEvent> { self.receiver.recv().await }

    /// Take an already-emitted event without waiting.
    pub fn try_recv(&mut self) -> Option<PipelineEvent> { self.receiver.try_recv().ok() }
}

impl Stream for EventStream {
    type Item = PipelineEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
