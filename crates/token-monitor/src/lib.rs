//! Broker token lifecycle tracking.
//!
//! Pure functions of a credential row plus an injected "now". Nothing here
//! reads the system clock or touches storage; the HTTP layer fetches rows,
//! asks the clock for the current instant, and passes both in.

pub mod expiry;
pub mod notify;
pub mod status;

pub use expiry::{
    access_token_minutes_remaining, is_access_token_expired, is_refresh_token_expired,
    refresh_token_days_remaining, REFRESH_TOKEN_VALIDITY_DAYS,
};
pub use notify::{derive_notifications, Priority, Severity, TokenAction, TokenNotification};
pub use status::{token_status, TokenStatus};
