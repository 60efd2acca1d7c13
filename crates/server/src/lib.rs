//! Lezzet server library.
//!
//! This crate provides the restaurant-information backend as a library,
//! allowing it to be tested and reused.
//!
//! # External collaborators
//!
//! All persistent state lives behind three gateways:
//! - Firebase Auth (identity) - token verification and user lookup
//! - Firestore (record store) - restaurants, menus, cuisines, users, counters
//! - Gemini (AI completion) - menu Q&A and menu-image analysis

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod firebase;
pub mod firestore;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
