pub mod marker;
pub mod store;

pub use marker::{Marker, MarkerId};
pub use store::{MarkerStore, NearestResult};
