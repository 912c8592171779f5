//! Logging macros
//!
//! One set of macros for every target:
//! - `defmt` feature: forwards to `defmt` (embedded, RTT/probe transport)
//! - `tracing` feature: forwards to `tracing` (desktop emulator)
//! - neither: compiled out, arguments still type-checked
//!
//! Only use plain `{}` / `{:x}` style placeholders with primitive
//! arguments so the same call site is valid for both backends.

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        $crate::fmt::discard(::core::format_args!($($arg)*));
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        $crate::fmt::discard(::core::format_args!($($arg)*));
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        $crate::fmt::discard(::core::format_args!($($arg)*));
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        $crate::fmt::discard(::core::format_args!($($arg)*));
    }};
}

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        $crate::fmt::discard(::core::format_args!($($arg)*));
    }};
}

/// Sink for log arguments when no backend is enabled.
#[cfg(not(any(feature = "defmt", feature = "tracing")))]
#[inline(always)]
pub(crate) fn discard(_args: core::fmt::Arguments<'_>) {}
