// Handlers are split by access tier:
// public (no token) and protected (bearer token with a route permission).
pub mod protected;
pub mod public;
