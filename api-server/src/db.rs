//! MongoDB 连接监控
//!
//! `ConnectionMonitor` owns the driver handle and the connectivity state the
//! health endpoint reports. The startup connect is a single attempt run as a
//! background task; failure is logged and leaves the state `disconnected`.
//! Once connected, driver heartbeats keep the state current: it drops to
//! `disconnected` when no server answers and returns to `connected` when
//! one does.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use async_trait::async_trait;
use common::errors::{AppError, AppResult};
use common::models::user::USERS;
use mongodb::bson::{doc, Document};
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Database used when the URI does not name one.
pub const DEFAULT_DATABASE: &str = "hackmate";

/// Label reported for a state code outside the known set.
pub const UNKNOWN_STATE: &str = "unknown";

/// Database link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectivityState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Disconnecting = 3,
}

impl ConnectivityState {
    /// All states, in code order.
    pub const ALL: [ConnectivityState; 4] = [
        ConnectivityState::Disconnected,
        ConnectivityState::Connected,
        ConnectivityState::Connecting,
        ConnectivityState::Disconnecting,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Disconnected),
            1 => Some(Self::Connected),
            2 => Some(Self::Connecting),
            3 => Some(Self::Disconnecting),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Disconnecting => "disconnecting",
        }
    }
}

/// A live driver client and the application database on it.
#[derive(Clone, Debug)]
pub struct MongoHandle {
    pub client: Client,
    pub database: Database,
}

/// Opens the database connection.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects to `uri`, resolving once the server has answered. Server
    /// heartbeats seen afterwards are reported to `monitor`.
    async fn connect(&self, uri: &str, monitor: Weak<ConnectionMonitor>) -> AppResult<MongoHandle>;
}

/// Connector backed by the official MongoDB driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self, uri: &str, monitor: Weak<ConnectionMonitor>) -> AppResult<MongoHandle> {
        let mut options = ClientOptions::parse(uri).await?;
        options.sdam_event_handler = Some(heartbeat_handler(monitor));
        let name = options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&name);

        // The driver connects lazily; ping so "connected" means reachable.
        database.run_command(doc! { "ping": 1 }).await?;

        if let Err(e) = ensure_indexes(&database).await {
            warn!(error = %e, "索引创建失败");
        }

        Ok(MongoHandle { client, database })
    }
}

/// Forwards driver heartbeat outcomes to the monitor.
fn heartbeat_handler(monitor: Weak<ConnectionMonitor>) -> EventHandler<SdamEvent> {
    EventHandler::callback(move |event: SdamEvent| {
        let Some(monitor) = monitor.upgrade() else {
            return;
        };
        match event {
            SdamEvent::ServerHeartbeatSucceeded(e) => {
                monitor.record_heartbeat(&e.server_address.to_string(), true)
            }
            SdamEvent::ServerHeartbeatFailed(e) => {
                monitor.record_heartbeat(&e.server_address.to_string(), false)
            }
            SdamEvent::ServerClosed(e) => {
                monitor.record_heartbeat(&e.address.to_string(), false)
            }
            _ => {}
        }
    })
}

async fn ensure_indexes(database: &Database) -> mongodb::error::Result<()> {
    let email_unique = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    database
        .collection::<Document>(USERS)
        .create_index(email_unique)
        .await?;
    Ok(())
}

/// Holds the connectivity state and, once connected, the driver handle.
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: AtomicU8,
    handle: RwLock<Option<MongoHandle>>,
    /// Servers whose last heartbeat succeeded.
    reachable: Mutex<HashSet<String>>,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    /// Creates a monitor in the `disconnected` state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectivityState::Disconnected.code()),
            handle: RwLock::new(None),
            reachable: Mutex::new(HashSet::new()),
        }
    }

    /// Current state, or `None` for an unmapped code.
    pub fn state(&self) -> Option<ConnectivityState> {
        ConnectivityState::from_code(self.state.load(Ordering::Acquire))
    }

    /// State name as reported by the health endpoint.
    pub fn state_label(&self) -> &'static str {
        self.state().map_or(UNKNOWN_STATE, ConnectivityState::as_str)
    }

    pub fn set_state(&self, state: ConnectivityState) {
        self.state.store(state.code(), Ordering::Release);
    }

    #[cfg(test)]
    pub(crate) fn set_state_code(&self, code: u8) {
        self.state.store(code, Ordering::Release);
    }

    /// Returns the application database.
    ///
    /// # Errors
    /// `AppError::DatabaseUnavailable` unless the state is `connected`.
    pub fn database(&self) -> AppResult<Database> {
        if self.state() != Some(ConnectivityState::Connected) {
            return Err(AppError::DatabaseUnavailable(self.state_label().to_string()));
        }
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|h| h.database.clone())
            .ok_or_else(|| AppError::DatabaseUnavailable(self.state_label().to_string()))
    }

    /// Records one heartbeat outcome for `server`.
    ///
    /// Only a connected or heartbeat-disconnected monitor with a live handle
    /// changes state: `connected` while any server is reachable, otherwise
    /// `disconnected`. Startup and shutdown transitions are left alone.
    pub fn record_heartbeat(&self, server: &str, ok: bool) {
        let mut reachable = self.reachable.lock().unwrap_or_else(PoisonError::into_inner);
        if ok {
            reachable.insert(server.to_string());
        } else {
            reachable.remove(server);
        }

        let has_handle = self
            .handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        if !has_handle {
            return;
        }

        let next = if reachable.is_empty() {
            ConnectivityState::Disconnected
        } else {
            ConnectivityState::Connected
        };
        let current = self.state();
        if current == Some(next)
            || !matches!(
                current,
                Some(ConnectivityState::Connected | ConnectivityState::Disconnected)
            )
        {
            return;
        }

        self.set_state(next);
        if next == ConnectivityState::Connected {
            info!(server, "MongoDB reachable again");
        } else {
            warn!(server, "MongoDB heartbeat failed, no reachable server");
        }
    }

    /// Runs one connect attempt. Errors are logged, never returned.
    pub async fn connect_with(self: &Arc<Self>, connector: &dyn Connector, uri: &str) {
        self.set_state(ConnectivityState::Connecting);
        info!(uri = %redact_uri(uri), "正在连接 MongoDB");

        match connector.connect(uri, Arc::downgrade(self)).await {
            Ok(handle) => {
                *self.handle.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                self.set_state(ConnectivityState::Connected);
                info!("MongoDB connected");
            }
            Err(e) => {
                self.set_state(ConnectivityState::Disconnected);
                error!(error = %e, "MongoDB connection error");
            }
        }
    }

    /// Closes the driver client, if any, and ends `disconnected`.
    pub async fn disconnect(&self) {
        let handle = self
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            self.set_state(ConnectivityState::Disconnecting);
            handle.client.shutdown().await;
            info!("MongoDB disconnected");
        }
        self.reachable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.set_state(ConnectivityState::Disconnected);
    }
}

/// Starts the one-shot connect attempt in the background.
///
/// The state flips to `connecting` before this returns, so a health check
/// issued right after startup never reports a stale `disconnected`.
pub fn spawn_connect(
    monitor: Arc<ConnectionMonitor>,
    connector: Arc<dyn Connector>,
    uri: String,
) -> JoinHandle<()> {
    monitor.set_state(ConnectivityState::Connecting);
    tokio::spawn(async move {
        monitor.connect_with(connector.as_ref(), &uri).await;
    })
}

/// Masks the password in a connection string for logging.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return uri.to_string();
    };
    let user = rest[..at].split(':').next().unwrap_or_default();
    format!("{scheme}://{user}:***{}", &rest[at..])
}
