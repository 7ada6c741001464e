// Public handlers: no Authorization header required
pub mod drinks;
pub mod system;
