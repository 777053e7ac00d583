//! Platform-agnostic state and services behind the landing page.

pub mod config;
pub mod contact;
pub mod platform;
pub mod preferences;
pub mod storage;
pub mod transport;
