//! Toroid Snake - a terminal Snake game on a wraparound grid
//!
//! This library provides:
//! - Core game logic and the fixed-tick state machine (game module)
//! - Tick scheduling that follows the game's speed (timer module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Score persistence (scores module)
//! - Execution modes (human play, leaderboard)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scores;
pub mod timer;
