//! Stateless repositories. Every method takes a `&Connection`, so the same
//! code runs on a pooled connection or inside a transaction.

pub mod response;
pub mod session;
pub mod story;

pub use response::ResponseRepo;
pub use session::SessionRepo;
pub use story::StoryRepo;
