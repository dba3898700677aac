//! Core types and trait definitions for the Aarambh learning platform.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! achievement engine ([`service::AchievementService`]) is written against the
//! [`store::PlatformStore`] abstraction so any backend can drive it.

pub mod account;
pub mod achievement;
pub mod bookmark;
pub mod calendar;
pub mod error;
pub mod service;
pub mod store;

pub use error::{Error, Result};
