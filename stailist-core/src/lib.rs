// src/lib.rs

pub mod portability;
pub mod repositories;
pub mod services;
pub mod stats;
pub mod store;

pub use stailist_common::error::Error;
pub use repositories::{JsonFileBackend, RestWardrobeBackend};
pub use services::{Persisted, StylistService, WardrobeStore};
pub use store::{WardrobeAction, WardrobeState, reduce};
