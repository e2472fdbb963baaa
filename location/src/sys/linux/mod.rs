//! Linux location implementation using the GeoClue2 D-Bus service.
//!
//! GeoClue does not expose per-provider switches. The network provider is
//! reported as enabled when the service advertises any accuracy level; the
//! satellite provider cannot be queried and reports `NotSupported`.
//!
//! A freshly started client has no location until GeoClue emits its first
//! `LocationUpdated` signal, so a fetch subscribes before `Start` and waits
//! for that signal, bounded by the backend's fix timeout.

use std::pin::pin;
use std::time::Duration;

use futures::future::{self, BoxFuture, Either};
use futures::{FutureExt, Stream, StreamExt};
use futures_timer::Delay;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};
use zbus::{Connection, MatchRule, MessageStream};

use crate::{LocationBackend, LocationError, LocationResult, Position, Provider};

const SERVICE: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";

// GCLUE_ACCURACY_LEVEL_EXACT
const ACCURACY_EXACT: u32 = 8;

/// Provider name reported for GeoClue fixes.
pub const GEOCLUE_PROVIDER: &str = "geoclue";

/// How long a fetch waits for GeoClue's first fix by default.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend talking to GeoClue2 on the system bus.
#[derive(Debug, Clone)]
pub struct GeoClueBackend {
    desktop_id: String,
    fix_timeout: Duration,
}

impl GeoClueBackend {
    /// Create a backend identifying itself with the default desktop id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_desktop_id("pinpoint")
    }

    /// Create a backend with the desktop id GeoClue authorises against.
    #[must_use]
    pub fn with_desktop_id(desktop_id: impl Into<String>) -> Self {
        Self {
            desktop_id: desktop_id.into(),
            fix_timeout: DEFAULT_FIX_TIMEOUT,
        }
    }

    /// Set how long a fetch waits for the first fix before reporting none.
    #[must_use]
    pub const fn with_fix_timeout(mut self, fix_timeout: Duration) -> Self {
        self.fix_timeout = fix_timeout;
        self
    }
}

impl Default for GeoClueBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationBackend for GeoClueBackend {
    fn is_provider_enabled(&self, provider: Provider) -> LocationResult<bool> {
        match provider {
            Provider::Gps => Err(LocationError::NotSupported),
            Provider::Network => available_accuracy_level().map(|level| level > 0),
        }
    }

    fn last_known_position(&self) -> BoxFuture<'_, LocationResult<Option<Position>>> {
        last_known(&self.desktop_id, self.fix_timeout).boxed()
    }
}

async fn system_bus() -> LocationResult<Connection> {
    Connection::system()
        .await
        .map_err(|e| LocationError::ServiceUnavailable(format!("D-Bus connection failed: {e}")))
}

async fn get_property(
    connection: &Connection,
    path: &str,
    interface: &str,
    name: &str,
) -> zbus::Result<OwnedValue> {
    connection
        .call_method(
            Some(SERVICE),
            path,
            Some(PROPERTIES_IFACE),
            "Get",
            &(interface, name),
        )
        .await?
        .body()
        .deserialize::<OwnedValue>()
}

async fn set_client_property(
    connection: &Connection,
    client_path: &str,
    name: &str,
    value: Value<'_>,
) -> LocationResult<()> {
    connection
        .call_method(
            Some(SERVICE),
            client_path,
            Some(PROPERTIES_IFACE),
            "Set",
            &(CLIENT_IFACE, name, value),
        )
        .await
        .map_err(|e| LocationError::Platform(format!("failed to set {name}: {e}")))?;
    Ok(())
}

async fn call_client(connection: &Connection, path: &str, method: &str) -> zbus::Result<()> {
    connection
        .call_method(Some(SERVICE), path, Some(CLIENT_IFACE), method, &())
        .await?;
    Ok(())
}

// The controller thread drives its futures with `futures::executor::block_on`,
// which cannot be nested; the blocking connection runs on zbus's own executor.
fn available_accuracy_level() -> LocationResult<u32> {
    let connection = zbus::blocking::Connection::system()
        .map_err(|e| LocationError::ServiceUnavailable(format!("D-Bus connection failed: {e}")))?;
    let value: OwnedValue = connection
        .call_method(
            Some(SERVICE),
            MANAGER_PATH,
            Some(PROPERTIES_IFACE),
            "Get",
            &(MANAGER_IFACE, "AvailableAccuracyLevel"),
        )
        .and_then(|reply| reply.body().deserialize())
        .map_err(|e| LocationError::ServiceUnavailable(format!("GeoClue2 not available: {e}")))?;

    u32::try_from(value).map_err(|e| LocationError::Platform(format!("bad accuracy level: {e}")))
}

async fn location_updates(connection: &Connection, client_path: &str) -> zbus::Result<MessageStream> {
    let rule = MatchRule::builder()
        .msg_type(zbus::message::Type::Signal)
        .sender(SERVICE)?
        .path(client_path)?
        .interface(CLIENT_IFACE)?
        .member("LocationUpdated")?
        .build();
    MessageStream::for_match_rule(rule, connection, Some(1)).await
}

async fn last_known(desktop_id: &str, fix_timeout: Duration) -> LocationResult<Option<Position>> {
    let connection = system_bus().await?;

    let (client_path,): (OwnedObjectPath,) = connection
        .call_method(Some(SERVICE), MANAGER_PATH, Some(MANAGER_IFACE), "GetClient", &())
        .await
        .map_err(|e| LocationError::ServiceUnavailable(format!("GeoClue2 not available: {e}")))?
        .body()
        .deserialize()
        .map_err(|e| LocationError::Platform(format!("GetClient reply: {e}")))?;
    let client_path = client_path.as_str();

    set_client_property(&connection, client_path, "DesktopId", Value::from(desktop_id)).await?;
    set_client_property(
        &connection,
        client_path,
        "RequestedAccuracyLevel",
        Value::from(ACCURACY_EXACT),
    )
    .await?;

    let updates = location_updates(&connection, client_path)
        .await
        .map_err(|e| LocationError::Platform(format!("failed to subscribe to updates: {e}")))?;

    call_client(&connection, client_path, "Start").await.map_err(|e| match e {
        zbus::Error::MethodError(ref name, _, _) if name.as_str().ends_with("AccessDenied") => {
            LocationError::PermissionDenied
        }
        e => LocationError::Platform(format!("failed to start client: {e}")),
    })?;

    let position = wait_for_fix(&connection, client_path, updates, fix_timeout).await;

    if let Err(e) = call_client(&connection, client_path, "Stop").await {
        log::debug!("failed to stop GeoClue client: {e}");
    }

    position
}

async fn wait_for_fix(
    connection: &Connection,
    client_path: &str,
    updates: MessageStream,
    fix_timeout: Duration,
) -> LocationResult<Option<Position>> {
    let value = get_property(connection, client_path, CLIENT_IFACE, "Location")
        .await
        .map_err(|e| LocationError::Platform(format!("failed to read location: {e}")))?;
    let current = OwnedObjectPath::try_from(value)
        .map_err(|e| LocationError::Platform(format!("bad location path: {e}")))?;

    let updates = updates.map(|message| {
        let message =
            message.map_err(|e| LocationError::Platform(format!("update stream failed: {e}")))?;
        let (_old, new): (OwnedObjectPath, OwnedObjectPath) = message
            .body()
            .deserialize()
            .map_err(|e| LocationError::Platform(format!("bad LocationUpdated: {e}")))?;
        Ok(new)
    });

    match first_fix_path(current, updates, fix_timeout).await? {
        Some(path) => read_position(connection, path.as_str()).await.map(Some),
        None => Ok(None),
    }
}

/// Resolve the client's location object path.
///
/// `current` is the path read right after `Start`. While it is still `/`
/// the first path carried by `updates` wins; a timeout or an exhausted
/// stream means there is no fix.
async fn first_fix_path<S>(
    current: OwnedObjectPath,
    updates: S,
    fix_timeout: Duration,
) -> LocationResult<Option<OwnedObjectPath>>
where
    S: Stream<Item = LocationResult<OwnedObjectPath>>,
{
    let path = if current.as_str() == "/" {
        let mut updates = pin!(updates);
        match future::select(updates.next(), Delay::new(fix_timeout)).await {
            Either::Left((Some(update), _)) => update?,
            Either::Left((None, _)) => return Ok(None),
            Either::Right(((), _)) => {
                log::debug!("no GeoClue fix within {fix_timeout:?}");
                return Ok(None);
            }
        }
    } else {
        current
    };

    Ok((path.as_str() != "/").then_some(path))
}

async fn read_position(connection: &Connection, location_path: &str) -> LocationResult<Position> {
    let coordinate = |name: &'static str| async move {
        let value = get_property(connection, location_path, LOCATION_IFACE, name)
            .await
            .map_err(|e| LocationError::Platform(format!("failed to read {name}: {e}")))?;
        f64::try_from(value).map_err(|e| LocationError::Platform(format!("bad {name}: {e}")))
    };

    let latitude = coordinate("Latitude").await?;
    let longitude = coordinate("Longitude").await?;

    Ok(Position {
        latitude,
        longitude,
        provider: GEOCLUE_PROVIDER.to_owned(),
    })
}
