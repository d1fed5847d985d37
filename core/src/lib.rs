//! Core library for the steady nutrition tracker.
//!
//! Carries the domain models, the flat-file record store, and the meal
//! auto-fill pipeline: label parsing, food classification, nutrition
//! research, and the draft controller. Front ends (the mobile app and the
//! CLI) wire in platform adapters for vision and the food database.

pub mod autofill;
pub mod classify;
pub mod error;
pub mod label;
pub mod models;
pub mod openfoodfacts;
pub mod researcher;
pub mod store;
pub mod vision;
