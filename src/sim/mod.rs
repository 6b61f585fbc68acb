pub mod event;
pub mod setup;
pub mod slide;
pub mod step;
pub mod world;
