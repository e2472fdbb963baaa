/// Android platform implementation.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "android", target_os = "ios")))]
mod desktop;
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub use desktop::DesktopLauncher as NativeLauncher;
