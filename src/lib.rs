pub mod animation;
pub mod combat;
pub mod compute;
pub mod config;
pub mod entities;
pub mod events;
pub mod geometry;
pub mod input;
pub mod level;
pub mod player;
pub mod session;
