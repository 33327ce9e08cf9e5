pub mod graph;
pub mod ports;
pub mod services;
pub mod session;
