pub mod permission;
pub mod question;
pub mod response;
pub mod survey;
pub mod template;
pub mod user;
