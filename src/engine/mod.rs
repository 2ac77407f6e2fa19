pub mod arena;
pub mod config;
pub mod creature;
pub mod decision;
pub mod food;
pub mod habitat;
pub mod lifecycle;
pub mod motion;
pub mod perception;
pub mod runner;
pub mod spatial;
