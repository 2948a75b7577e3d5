//! Error macros for trackport

/// Abort a domain import with a structural validation error
#[macro_export]
macro_rules! bail_structural {
    ($domain:expr, $($arg:tt)+) => {
        return Err($crate::error::TrackportError::structural($domain, format!($($arg)+)))
    };
}
