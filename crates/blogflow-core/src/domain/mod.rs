//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{MAX_TITLE_LEN, Post, PostState, validate_body};
pub use user::{ADMIN_ROLE, NewUser, Principal, User, normalize_email};
