//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `MscError`
///
/// # Examples
///
/// ```rust
/// use msc_common::bail;
/// use msc_common::Result;
///
/// fn check_page(page: u32) -> Result<()> {
///     if page == 0 {
///         bail!("Pages are numbered from 1, got: {}", page);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::MscError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::MscError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::MscError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but for `MscError`, producing a validation error
///
/// # Examples
///
/// ```rust
/// use msc_common::ensure;
/// use msc_common::Result;
///
/// fn validate_per_page(per_page: u8) -> Result<()> {
///     ensure!((1..=100).contains(&per_page), "per_page must be 1..=100, got: {}", per_page);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::MscError::validation($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::MscError::validation($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::MscError::validation(format!($fmt, $($arg)*)));
        }
    };
}
