pub mod bounds;
pub mod config;
pub mod constants;
pub mod distance;
pub mod geo;
pub mod map;
pub mod projection;
pub mod viewport;
