//! Headless game environment.
//!
//! Holds the authoritative board between agent turns: whose turn it is, the
//! last move, how many stones have been placed, and whether the game is
//! decided. Agents only ever see snapshots of it.

pub mod game;

pub use game::Game;
