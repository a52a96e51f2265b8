pub mod config;
pub mod dirinfo;
pub mod error;
pub mod platform;
pub mod remote;

#[cfg(test)]
mod tests;
