pub mod rtc_token;
pub mod token;

pub use token::RtcTokenService;
