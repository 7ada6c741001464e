// Protected handlers run behind `permission_middleware`; the decoded
// claims are available as `Extension<Claims>`.
pub mod drinks;
