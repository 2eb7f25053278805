use crate::error::{ServerError, SessionError};
use crate::properties::ServerProperties;
use crate::registry::ClientRegistry;
use crate::session::Session;

use cobble_threadpool::{FixedSizePool, Pool};
use std::net::{SocketAddr, TcpListener};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use uuid::Uuid;

///
/// How often registered sessions get a tick scheduled, matching the vanilla 20 Hz cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

///
/// State shared between the orchestrator, its sessions, and the ticker thread.
pub(crate) struct Shared {
    pub(crate) properties: ServerProperties,
    pub(crate) favicon: Option<String>,
    pub(crate) registry: ClientRegistry,
    pub(crate) stopping: AtomicBool,
}

///
/// The orchestrator's lifecycle phase. Only the thread driving [`Server::run`] mutates this.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServerStatus {
    ///
    /// Constructed but not yet accepting connections.
    Starting,

    ///
    /// Accepting connections and ticking sessions.
    Running,

    ///
    /// Shutting down.
    Stopping,
}

///
/// The server orchestrator: owns the listening socket, the worker pool, the properties document,
/// the optional favicon, and the shared client registry.
///
/// [`Server::run`] accepts connections on the calling thread, performing each connection's login
/// phase synchronously there, while a ticker thread schedules one [`Session::tick`] per
/// registered session onto the pool every [`TICK_INTERVAL`].
pub struct Server {
    listener: TcpListener,
    pool: Arc<FixedSizePool>,
    shared: Arc<Shared>,
    status: ServerStatus,
    ticker: Option<JoinHandle<()>>,
}

impl Server {
    ///
    /// Binds the listening socket at `(server-ip, server-port)` from the properties (defaults
    /// `0.0.0.0:25565`) and spawns a worker pool sized one below the CPU count.
    ///
    /// # Errors
    /// Returns `Err` when the configured port is out of range or the socket cannot be bound.
    /// Both are fatal: there is no server to run.
    pub fn bind(
        properties: ServerProperties,
        favicon: Option<String>,
    ) -> Result<Self, ServerError> {
        let port = u16::try_from(properties.server_port)
            .map_err(|_| ServerError::InvalidPort(properties.server_port))?;

        let ip = if properties.server_ip.is_empty() {
            "0.0.0.0"
        } else {
            properties.server_ip.as_str()
        };

        let listener = TcpListener::bind((ip, port)).map_err(ServerError::Bind)?;

        let workers = std::thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .saturating_sub(1)
            .max(1);
        let pool = Arc::new(FixedSizePool::new(workers));

        tracing::info!(%ip, port, workers, "bound");

        Ok(Self {
            listener,
            pool,
            shared: Arc::new(Shared {
                properties,
                favicon,
                registry: ClientRegistry::new(),
                stopping: AtomicBool::new(false),
            }),
            status: ServerStatus::Starting,
            ticker: None,
        })
    }

    ///
    /// The address the listener actually bound, useful when `server-port` is `0`.
    ///
    /// # Errors
    /// Returns `Err` if the socket has no local address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    ///
    /// The current lifecycle phase.
    #[must_use]
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    ///
    /// The number of registered clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.shared.registry.len()
    }

    ///
    /// Blocks for one incoming connection and wraps it as a fresh session in the handshake
    /// state.
    ///
    /// # Errors
    /// Returns `Err` if accepting fails.
    pub fn accept(&self) -> Result<Arc<Mutex<Session>>, ServerError> {
        let (stream, peer) = self.listener.accept().map_err(ServerError::Accept)?;
        tracing::debug!(%peer, "accepted connection");

        Ok(Arc::new(Mutex::new(Session::new(
            Arc::clone(&self.shared),
            stream,
            peer,
        ))))
    }

    ///
    /// Snapshots the registry and schedules one tick per registered session on the pool.
    pub fn tick(&self) {
        schedule_ticks(&self.shared, &self.pool);
    }

    ///
    /// Runs the accept loop on the calling thread: accept, then drive the new session's login
    /// phase to completion before accepting again. A per-session failure is logged and dropped;
    /// only listener-level failures end the loop.
    ///
    /// # Errors
    /// Returns `Err` when accepting fails at the listener level.
    pub fn run(&mut self) -> Result<(), ServerError> {
        self.status = ServerStatus::Running;
        self.start_ticker();

        tracing::info!("accepting connections");

        loop {
            let session = self.accept()?;

            // the login phase runs here, on the accepting thread; registered sessions are
            // ticked by the pool from then on
            match Session::login(&session) {
                Ok(()) | Err(SessionError::Disconnected | SessionError::LegacyClient) => {}
                Err(err) => tracing::debug!(%err, "connection dropped during login"),
            }
        }
    }

    fn start_ticker(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let pool = Arc::clone(&self.pool);

        let handle = std::thread::Builder::new()
            .name(String::from("cobble-ticker"))
            .spawn(move || {
                while !shared.stopping.load(Ordering::Relaxed) {
                    schedule_ticks(&shared, &pool);
                    std::thread::sleep(TICK_INTERVAL);
                }
            })
            .expect("should have been able to spawn ticker thread");

        self.ticker = Some(handle);
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.status = ServerStatus::Stopping;
        self.shared.stopping.store(true, Ordering::Relaxed);

        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.join();
        }

        // best-effort farewell to whoever is still registered; a session whose worker is
        // mid-tick is skipped rather than waited on
        for (_, session) in self.shared.registry.snapshot() {
            if let Ok(mut guard) = session.try_lock() {
                guard.disconnect("Server closed");
            }
        }

        // the pool joins its workers when it drops, after `shared` stops producing tasks
    }
}

fn schedule_ticks(shared: &Arc<Shared>, pool: &Arc<FixedSizePool>) {
    for (uuid, session) in shared.registry.snapshot() {
        pool.submit(move || run_session_tick(uuid, &session));
    }
}

fn run_session_tick(uuid: Uuid, session: &Arc<Mutex<Session>>) {
    // a previous tick may still be blocked reading this session's socket; queueing another
    // worker behind it helps nobody
    let Ok(mut guard) = session.try_lock() else {
        return;
    };

    match guard.tick() {
        Ok(()) => {}

        Err(err) => {
            if let SessionError::Packet(packet_err) = &err {
                tracing::debug!(%uuid, %packet_err, "session aborted");
            }

            guard.release();
        }
    }
}
