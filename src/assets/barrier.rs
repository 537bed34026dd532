use crate::{core::geo::ImageExtent, data::dataset::MarkerRecord};

#[derive(Debug, Clone, PartialEq)]
enum DatasetState {
    Pending,
    Ready(Vec<MarkerRecord>),
    Failed,
}

/// Joins the dataset load and the basemap load.
///
/// Base markers can only be projected once both the records and the image
/// extent are known. Whichever arrives second opens the barrier, and
/// [`LoadBarrier::release`] hands the records out exactly once. A failed
/// dataset releases an empty set so the viewer still comes up.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBarrier {
    dataset: DatasetState,
    extent: Option<ImageExtent>,
    released: bool,
}

impl Default for LoadBarrier {
    fn default() -> Self {
        Self {
            dataset: DatasetState::Pending,
            extent: None,
            released: false,
        }
    }
}

impl LoadBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset_ready(&mut self, records: Vec<MarkerRecord>) {
        if self.dataset == DatasetState::Pending {
            self.dataset = DatasetState::Ready(records);
        }
    }

    pub fn dataset_failed(&mut self) {
        if self.dataset == DatasetState::Pending {
            self.dataset = DatasetState::Failed;
        }
    }

    pub fn extent_ready(&mut self, extent: ImageExtent) {
        self.extent = Some(extent);
    }

    pub fn is_open(&self) -> bool {
        self.extent.is_some() && self.dataset != DatasetState::Pending
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Takes the records if both sides have completed and nothing has been
    /// released yet.
    pub fn release(&mut self) -> Option<Vec<MarkerRecord>> {
        if self.released || !self.is_open() {
            return None;
        }
        self.released = true;
        match std::mem::replace(&mut self.dataset, DatasetState::Failed) {
            DatasetState::Ready(records) => Some(records),
            _ => Some(Vec::new()),
        }
    }
}
