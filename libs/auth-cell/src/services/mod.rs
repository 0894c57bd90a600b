pub mod account;
pub mod password;

pub use account::AccountService;
pub use password::PasswordService;
