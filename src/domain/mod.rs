pub mod ability;
pub mod ai;
pub mod entity;
pub mod grid;
pub mod position;
