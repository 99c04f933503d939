//! Password authentication for the dashboard.
//!
//! A single password, set on the server with the `set_password` program,
//! protects the dashboard. Logging in stores an encrypted session cookie that
//! the auth guard checks and refreshes on each request.

mod guard;
mod log_in;
mod log_out;
mod password;
mod redirect;
mod session;
mod user;

pub use guard::{auth_guard, auth_guard_hx};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use password::{PasswordHash, ValidatedPassword};
pub(crate) use redirect::normalize_redirect_url;
pub use session::SessionConfig;
pub use user::{OWNER_ID, User, UserID, create_user_table, get_user_by_id, upsert_user};

#[cfg(test)]
pub(crate) use session::SESSION_COOKIE;
