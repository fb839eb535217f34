//! Infrastructure implementations of the domain seams

pub mod account;
pub mod auth;
pub mod logging;
pub mod news;
pub mod notifier;
pub mod weather;
