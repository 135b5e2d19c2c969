//! Tokio host for the playback controller.
//!
//! One task owns the controller for its whole life. Requests reach it over an
//! mpsc channel and answer over oneshot channels; the task sleeps until the
//! earliest pending frame or deadline between requests. Pending wakeups live
//! only inside that task, so a cancelled handle is simply dropped from the
//! queue and can never be delivered.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use storyreel_core::clock::Clock;
use storyreel_core::error::DomainError;
use storyreel_core::render::Progress;
use storyreel_core::scheduler::{DeadlineHandle, DueWakeups, FrameHandle, Scheduler, Wakeup};
use storyreel_playback::commands::PlaybackCommand;
use storyreel_playback::config::PlaybackConfig;
use storyreel_playback::controller::PlaybackController;
use storyreel_stories::domain::story::{Story, StoryStore};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::renderer::{PlaybackSnapshot, WatchRenderer};

const REQUEST_BUFFER: usize = 64;

/// Wall time derived from the tokio clock, so paused test time and the
/// playback countdown agree.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    origin: Instant,
    origin_at: DateTime<Utc>,
}

impl RuntimeClock {
    /// Anchors the clock at the current tokio instant and wall time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            origin_at: Utc::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        let since = TimeDelta::from_std(self.origin.elapsed()).unwrap_or_default();
        self.origin_at + since
    }
}

/// [`Scheduler`] backed by the tokio timer of the owning task.
#[derive(Debug)]
pub struct TokioScheduler {
    frame_interval: Duration,
    next_id: u64,
    pending: Vec<(Instant, Wakeup)>,
}

impl TokioScheduler {
    /// Creates a scheduler that spaces frames `frame_interval` apart.
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// When the earliest pending wakeup is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Number of pending wakeups.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, after: Duration) -> (Instant, u64) {
        self.next_id += 1;
        (Instant::now() + after, self.next_id)
    }

    fn remove(&mut self, wakeup: Wakeup) {
        self.pending.retain(|(_, pending)| *pending != wakeup);
    }
}

impl Scheduler for TokioScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let (at, id) = self.push(self.frame_interval);
        let handle = FrameHandle(id);
        self.pending.push((at, Wakeup::Frame(handle)));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.remove(Wakeup::Frame(handle));
    }

    fn schedule_deadline(&mut self, after: Duration) -> DeadlineHandle {
        let (at, id) = self.push(after);
        let handle = DeadlineHandle(id);
        self.pending.push((at, Wakeup::Deadline(handle)));
        handle
    }

    fn cancel_deadline(&mut self, handle: DeadlineHandle) {
        self.remove(Wakeup::Deadline(handle));
    }
}

impl DueWakeups for TokioScheduler {
    type Instant = Instant;

    fn pop_due(&mut self, now: Instant) -> Option<Wakeup> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= now)
            .min_by_key(|(_, (at, wakeup))| (*at, matches!(wakeup, Wakeup::Deadline(_))))
            .map(|(position, _)| position)?;
        Some(self.pending.remove(position).1)
    }
}

type HostedController = PlaybackController<TokioScheduler, WatchRenderer>;
type StoryQuery = Box<dyn FnOnce(&StoryStore) + Send>;

enum Request {
    Append {
        story: Story,
        reply: oneshot::Sender<usize>,
    },
    Execute {
        command: PlaybackCommand,
        reply: oneshot::Sender<PlaybackSnapshot>,
    },
    Stories(StoryQuery),
}

/// Cloneable handle to the playback task.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    /// Spawns the playback task on the current tokio runtime.
    ///
    /// The task stops once every handle has been dropped.
    #[must_use]
    pub fn spawn(config: PlaybackConfig, frame_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let (renderer, snapshots) = WatchRenderer::new(PlaybackSnapshot::closed(
            Progress::reset(config.story_duration()),
        ));
        let controller = PlaybackController::new(
            config,
            clock,
            TokioScheduler::new(frame_interval),
            renderer,
        );
        let (requests, receiver) = mpsc::channel(REQUEST_BUFFER);
        tokio::spawn(run(controller, receiver));
        info!(
            story_duration_ms = config.story_duration().as_millis(),
            frame_interval_ms = frame_interval.as_millis(),
            "playback task started"
        );
        Self {
            requests,
            snapshots,
        }
    }

    /// Appends a story, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the playback task is gone.
    pub async fn append(&self, story: Story) -> Result<usize, DomainError> {
        let (reply, response) = oneshot::channel();
        self.send(Request::Append { story, reply }).await?;
        response.await.map_err(|_| task_gone())
    }

    /// Executes a playback command and returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the playback task is gone.
    pub async fn execute(&self, command: PlaybackCommand) -> Result<PlaybackSnapshot, DomainError> {
        let (reply, response) = oneshot::channel();
        self.send(Request::Execute { command, reply }).await?;
        response.await.map_err(|_| task_gone())
    }

    /// Runs `query` against the story sequence inside the playback task.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the playback task is gone.
    pub async fn query_stories<T, F>(&self, query: F) -> Result<T, DomainError>
    where
        F: FnOnce(&StoryStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let query: StoryQuery = Box::new(move |stories| {
            let _ = reply.send(query(stories));
        });
        self.send(Request::Stories(query)).await?;
        response.await.map_err(|_| task_gone())
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    async fn send(&self, request: Request) -> Result<(), DomainError> {
        self.requests.send(request).await.map_err(|_| task_gone())
    }
}

fn task_gone() -> DomainError {
    DomainError::Infrastructure("playback task is not running".to_string())
}

async fn run(mut controller: HostedController, mut requests: mpsc::Receiver<Request>) {
    loop {
        let due = controller.scheduler().next_due();
        let wake = async move {
            match due {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            request = requests.recv() => match request {
                Some(request) => handle(&mut controller, request),
                None => break,
            },
            () = wake => {
                let delivered = controller.deliver_due(Instant::now());
                trace!(delivered, "wakeups delivered");
            }
        }
    }
    debug!("playback task stopped");
}

fn handle(controller: &mut HostedController, request: Request) {
    match request {
        Request::Append { story, reply } => {
            let index = controller.append(story);
            let _ = reply.send(index);
        }
        Request::Execute { command, reply } => {
            controller.execute(&command);
            let _ = reply.send(controller.renderer().snapshot());
        }
        Request::Stories(query) => query(controller.stories()),
    }
}
