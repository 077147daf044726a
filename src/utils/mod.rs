pub mod auth;
pub mod email;
pub mod error;
pub mod response;
