/// Middleware modules for the API server
///
/// - `auth`: JWT authentication and principal resolution

pub mod auth;
