pub mod barrier;
pub mod loader;
pub mod source;

pub use barrier::LoadBarrier;
pub use loader::{AssetEvent, AssetId, AssetLoader, LoadedImage};
pub use source::{AssetSource, DefaultSource, FileSource, HttpSource, MemorySource};
