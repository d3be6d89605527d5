// File: src/services/mod.rs

pub mod stylist_service;
pub mod wardrobe_service;

pub use stylist_service::StylistService;
pub use wardrobe_service::{Persisted, WardrobeStore};
