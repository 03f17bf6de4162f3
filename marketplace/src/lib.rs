// marketplace/src/lib.rs

//! Multi-vendor marketplace backend: vendor product catalogue, categories,
//! flash sales and password recovery behind an actix-web REST API.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod validation;
pub mod web;
