pub mod admin;
pub mod count;
pub mod upload;
