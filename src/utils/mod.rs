// src/utils/mod.rs
//! Shared helper functions.

pub mod address;
