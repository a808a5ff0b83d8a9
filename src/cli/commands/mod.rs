pub mod serve;
pub mod session;
pub mod style;
