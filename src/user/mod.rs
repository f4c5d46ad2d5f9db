//! User accounts and platform roles.
//!
//! Users live in the `users` table. Roles are `user`, `admin` and `owner`;
//! the first registered account becomes the owner and ownership only moves
//! through [`change_role`].

mod crud;
mod role;
mod storage;
mod types;

pub use crud::{get_user, get_user_by_username, list_users, register_user, RegisterUserOptions};
pub use role::{change_role, RoleChangeResult};
pub use storage::load_user;
pub use types::{validate_username, PlatformRole, User, UserError};
