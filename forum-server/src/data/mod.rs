pub mod comment_repository;
pub mod memory;
pub mod post_repository;
pub mod postgres;
pub mod profile_repository;

use comment_repository::CommentRepository;
use post_repository::PostRepository;
use profile_repository::ProfileRepository;

/// The persistence collaborator: every collection the forum reads and writes.
/// No cross-record transactions are assumed.
pub trait RecordStore: PostRepository + CommentRepository + ProfileRepository + 'static {}

impl<T> RecordStore for T where T: PostRepository + CommentRepository + ProfileRepository + 'static {}
