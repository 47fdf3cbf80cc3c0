//! Network layer: the admin API seam and its wire types.

pub mod api;
pub mod types;

pub use api::{AdminApi, ApiError, HttpAdminApi};
pub use types::{AdminUser, Credentials, LoginResponse};
