#![forbid(unsafe_code)]

//! `todont`: shareable lists of things to avoid doing.
//!
//! Items start checked and may only be unchecked once their optional
//! avoid-until deadline has passed. The [`persistence::ListStore`] contract
//! owns lists and items; [`models::activity`] derives whether an item is
//! still active; [`http`] exposes both as a JSON API.

pub mod clock;
pub mod config;
pub mod errors;
pub mod http;
pub mod ids;
pub mod models;
pub mod persistence;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
