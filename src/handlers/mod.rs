// handlers/mod.rs - HTTP route handlers
//
// Public:    GET /, GET /health
// Session:   PATCH /api/profile (SIWE session cookie required)

pub mod profile;
pub mod system;
