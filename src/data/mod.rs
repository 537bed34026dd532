pub mod dataset;

pub use dataset::{parse_dataset, DatasetLoad, MarkerRecord, RecordError};
