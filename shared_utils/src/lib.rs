//! Utilities shared by the portfolio application crates.
//!
//! The formatting and validation helpers are plain functions and compile for
//! every target. Retry/backoff and debouncing need a tokio runtime and live
//! behind the `runtime` feature, which only the server side enables.

#[cfg(feature = "runtime")]
mod debounce;
#[cfg(feature = "runtime")]
mod retry;
mod text;
mod validation;

#[cfg(feature = "runtime")]
pub use debounce::Debouncer;
#[cfg(feature = "runtime")]
pub use retry::{retry_async, retry_async_if, RetryConfig};
pub use text::{deep_clone, estimate_read_time, format_date, format_date_str, generate_id};
pub use validation::{is_valid_email, validate_password, PasswordCheck, PasswordStrength};
