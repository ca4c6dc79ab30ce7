pub mod comment;
pub mod error;
pub mod feed;
pub mod post;
pub mod profile;
pub mod time;
