use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pinforge_core::{FeedItem, GeneratedPin, ImperfectionIntensity, ProductInput};

/// Everything a batch run needs, captured when the run starts.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub input: ProductInput,
    /// UI intensity (0–5); pins store twice this value as their level.
    pub intensity: ImperfectionIntensity,
    /// Loaded feed entries. Only read for feed runs.
    pub feed_items: Vec<FeedItem>,
    /// Add pins to the existing project instead of starting a new one.
    pub append: bool,
}

impl BatchRequest {
    #[must_use]
    pub fn new(input: ProductInput, intensity: ImperfectionIntensity) -> Self {
        Self {
            input,
            intensity,
            feed_items: Vec::new(),
            append: false,
        }
    }
}

/// Progress notifications emitted during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Status(String),
    PinAdded(GeneratedPin),
    PinUpdated(GeneratedPin),
    /// Emitted once, just before the run aborts on a rejected credential.
    AuthRequired,
}

/// One unit of batch work: a keyword plus the feed link it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub keyword: String,
    pub link: Option<String>,
}

/// Cooperative stop signal shared between the caller and a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
