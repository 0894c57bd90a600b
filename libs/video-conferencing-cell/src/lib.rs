//! # Video Conferencing Cell
//!
//! Issues RTC access tokens so patients and doctors can join a consultation
//! channel directly from the browser. Tokens are signed locally with the
//! configured app certificate; no call is made to the RTC provider.
//!
//! ## API Endpoints
//!
//! - `POST /generate-token` - Publisher token for uid 0 on a channel
//! - `POST /generateToken` - Token for a specific uid and role
//!
//! Both endpoints are public.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::RtcTokenError;
pub use router::video_conferencing_routes;
pub use services::rtc_token::{AccessToken, Privilege, RtcRole};
pub use services::RtcTokenService;
