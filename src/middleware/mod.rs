pub mod auth;
pub mod response;

pub use auth::{permission_middleware, PermissionGuard};
pub use response::{ApiResponse, ApiResult};
