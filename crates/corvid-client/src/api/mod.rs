//! API endpoint implementations.

mod articles;
mod status;
mod users;

pub use articles::{ArticlesApi, ListArticlesQuery};
pub use status::StatusApi;
pub use users::{ListUsersQuery, UsersApi};
