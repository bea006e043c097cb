//! Command handlers orchestrating domain logic and host services.

pub mod checkpoint;
pub mod greet;
pub mod run_scene;
pub mod scene;
