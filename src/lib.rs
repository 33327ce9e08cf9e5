pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod platform;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod tests;
