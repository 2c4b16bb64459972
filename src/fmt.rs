//! Logging macros that go to `defmt` on the badge and to `log` on the host.
//!
//! Arguments must format with both backends, so stick to plain `{}`
//! placeholders and primitive values.

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "board")]
        ::defmt::info!($($arg)*);
        #[cfg(not(feature = "board"))]
        ::log::info!($($arg)*);
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "board")]
        ::defmt::error!($($arg)*);
        #[cfg(not(feature = "board"))]
        ::log::error!($($arg)*);
    }};
}
