//! Tile-arena snake: continuous head motion locked to a grid, a smoothly
//! trailing body, breadth-first AI opponents and a mode-aware match flow.

pub mod ai;
pub mod arena;
pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod level;
pub mod motion;
pub mod pathfinding;
pub mod renderer;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
