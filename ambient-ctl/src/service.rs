//! Ambient service task
//!
//! Multi-threaded hosts cannot touch an [`AmbientSession`] directly: trigger
//! volumes, spawn logic and UI all live on different tasks. The service owns
//! the session on a single tokio task and serializes every mutation through
//! an mpsc command queue. Between commands the task sleeps until the next
//! timer is due. Session time is the tokio clock measured from spawn.

use crate::audio::AudioChannel;
use crate::playback::OccupancyEdge;
use crate::session::{AmbientSession, SessionSnapshot};
use crate::{Error, Result};
use ambient_common::time::secs_to_duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

enum Command {
    VolumeEnter(oneshot::Sender<Option<OccupancyEdge>>),
    VolumeExit(oneshot::Sender<Option<OccupancyEdge>>),
    SpawnCheck([f32; 3], oneshot::Sender<Vec<OccupancyEdge>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Cloneable handle to a running [`AmbientService`]
#[derive(Clone)]
pub struct AmbientHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl AmbientHandle {
    /// The local user started overlapping a trigger volume
    pub async fn volume_enter(&self) -> Result<Option<OccupancyEdge>> {
        self.request(Command::VolumeEnter).await
    }

    /// The local user stopped overlapping a trigger volume
    pub async fn volume_exit(&self) -> Result<Option<OccupancyEdge>> {
        self.request(Command::VolumeExit).await
    }

    /// The local user spawned at `position`
    pub async fn spawn_check(&self, position: [f32; 3]) -> Result<Vec<OccupancyEdge>> {
        self.request(|reply| Command::SpawnCheck(position, reply)).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(Command::Snapshot).await
    }

    /// Ask the task to stop; the session is returned through its join handle
    pub fn shutdown(&self) -> Result<()> {
        self.tx.send(Command::Shutdown).map_err(|_| Error::ServiceClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).map_err(|_| Error::ServiceClosed)?;
        reply_rx.await.map_err(|_| Error::ServiceClosed)
    }
}

/// Single-owner task driving an [`AmbientSession`] on the tokio clock
pub struct AmbientService<C: AudioChannel> {
    session: AmbientSession<C>,
    origin: Instant,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl<C> AmbientService<C>
where
    C: AudioChannel + Send + 'static,
{
    /// Start `session` on a new task
    ///
    /// The session is started (start delay, intro) inside the task. The join
    /// handle yields the session once every handle is dropped or
    /// [`AmbientHandle::shutdown`] is called.
    pub fn spawn(session: AmbientSession<C>) -> (AmbientHandle, JoinHandle<AmbientSession<C>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self {
            session,
            origin: Instant::now(),
            rx,
        };

        let task = tokio::spawn(service.run());
        (AmbientHandle { tx }, task)
    }

    async fn run(mut self) -> AmbientSession<C> {
        info!("Ambient service started");
        self.session.start();

        loop {
            let next_due = self.session.next_due();
            let deadline = next_due.and_then(|due| self.origin.checked_add(secs_to_duration(due)));

            tokio::select! {
                command = self.rx.recv() => {
                    self.catch_up();
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                _ = wait_until(deadline) => {
                    // Never fall short of the due time, or the timer would
                    // fire again immediately
                    let due = next_due.unwrap_or(0.0);
                    let dispatched = self.session.advance_to(self.elapsed().max(due));
                    debug!("Dispatched {} timer task(s)", dispatched);
                }
            }
        }

        self.catch_up();
        info!("Ambient service stopped at {:.3}s", self.session.now());
        self.session
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver only means the caller lost interest
        match command {
            Command::VolumeEnter(reply) => {
                let _ = reply.send(self.session.volume_enter());
            }
            Command::VolumeExit(reply) => {
                let _ = reply.send(self.session.volume_exit());
            }
            Command::SpawnCheck(position, reply) => {
                let _ = reply.send(self.session.spawn_check(position));
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    /// Run timers that came due while the task was busy
    fn catch_up(&mut self) {
        let elapsed = self.elapsed();
        self.session.advance_to(elapsed);
    }

    fn elapsed(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
