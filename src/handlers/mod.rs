// src/handlers/mod.rs

pub mod profile;
pub mod questions;
pub mod quiz;
pub mod subjects;
