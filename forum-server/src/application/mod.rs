pub mod comment_service;
pub mod post_service;
pub mod profile_service;
pub mod upvote_service;
