//! T-Rex Runner - Terminal Endless Runner Library
//!
//! This module exposes the simulation for testing and external use.

// Allow dead code in library - some functions are only used by the binary
#![allow(dead_code)]

pub mod audio;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod entities;
pub mod geometry;
pub mod graphics;
pub mod input;
pub mod save_manager;
pub mod session;
pub mod simulation;
pub mod utils;

// UI module is not exposed as it's tightly coupled to the terminal
mod ui;
