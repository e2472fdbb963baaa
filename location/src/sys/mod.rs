//! Platform-specific location implementations.

/// Android platform implementation.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(any(target_os = "android", test))]
mod last_known;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::GeoClueBackend as NativeLocation;

#[cfg(not(any(target_os = "android", target_os = "linux")))]
pub use unsupported::UnsupportedBackend as NativeLocation;

#[cfg(not(any(target_os = "android", target_os = "linux")))]
mod unsupported {
    use futures::FutureExt;
    use futures::future::BoxFuture;

    use crate::{LocationBackend, LocationError, LocationResult, Position, Provider};

    /// Backend for platforms without a location service binding.
    #[derive(Debug, Default)]
    pub struct UnsupportedBackend;

    impl UnsupportedBackend {
        /// Create the backend.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl LocationBackend for UnsupportedBackend {
        fn is_provider_enabled(&self, _provider: Provider) -> LocationResult<bool> {
            Err(LocationError::NotSupported)
        }

        fn last_known_position(&self) -> BoxFuture<'_, LocationResult<Option<Position>>> {
            async { Err(LocationError::NotSupported) }.boxed()
        }
    }
}
