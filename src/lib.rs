// src/lib.rs
pub mod alignment;
pub mod api;
pub mod assets;
pub mod banner;
pub mod category;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod highlight;
pub mod models;
pub mod providers;
pub mod runner;
pub mod workflow;
