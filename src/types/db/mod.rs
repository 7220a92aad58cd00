pub mod file_access;
pub mod login_attempt;
pub mod user;
