// src/repositories/mod.rs

pub mod json_file;
pub mod rest;

pub use json_file::JsonFileBackend;
pub use rest::RestWardrobeBackend;
