//! Crate to abstract out tracing so disabled levels never show up in builds.
//!
//! The feature checks happen here, inside `ewe_trace`, and not at the call
//! site: each macro is defined twice and the disabled variant expands to
//! nothing. Callers only depend on `ewe_trace` and pick levels through its
//! cargo features (`standard`, `debug_trace`).
//!
//! See similar: https://doc.rust-lang.org/src/std/macros.rs.html#138-145.

#[doc(hidden)]
pub use tracing;

#[cfg(feature = "log_info")]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        $crate::tracing::info!($($t)*)
    };
}

#[cfg(not(feature = "log_info"))]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "log_warnings")]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        $crate::tracing::warn!($($t)*)
    };
}

#[cfg(not(feature = "log_warnings"))]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "log_errors")]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        $crate::tracing::error!($($t)*)
    };
}

#[cfg(not(feature = "log_errors"))]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "log_debug")]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        $crate::tracing::debug!($($t)*)
    };
}

#[cfg(not(feature = "log_debug"))]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => {
        $crate::tracing::trace!($($t)*)
    };
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => {{}};
}
