pub mod access;
pub mod password;
pub mod session;
