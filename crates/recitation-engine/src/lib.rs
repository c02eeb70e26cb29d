//! Verse-by-verse recitation playback
//!
//! The engine plays an ordered verse sequence through a single reusable
//! audio sink. Each verse is played in its recitation and then, when a
//! translation narrator is configured, in translation, before moving on.
//!
//! # Example
//!
//! ```rust,no_run
//! use recitation_engine::testing::RecordingSink;
//! use recitation_engine::{NarratorSelection, NoopWarmer, PlaybackEngine, PositionTracker, Prefetcher};
//! use tilawah_core::{Catalog, ChapterId};
//! use tilawah_storage::MemoryStore;
//!
//! let mut engine = PlaybackEngine::new(
//!     Box::new(RecordingSink::new()),
//!     Box::new(NarratorSelection::new("ar.alafasy", "en.walk")),
//!     Prefetcher::new(NoopWarmer),
//!     PositionTracker::new(MemoryStore::new()),
//! );
//!
//! let chapter = ChapterId::new(1).expect("valid chapter");
//! engine.start(Catalog::chapter_sequence(chapter), 0).expect("non-empty chapter");
//! ```

mod context;
mod controller;
mod engine;
mod error;
mod locator;
mod narrator;
mod observer;
mod prefetch;
mod sink;
mod state;
mod tracker;

pub mod testing;

pub use context::PlaybackContextHolder;
pub use controller::{PlayOutcome, PlaybackController, View};
pub use engine::{EngineSettings, PlaybackEngine};
pub use error::{EngineError, EngineResult};
pub use locator::{ResourceAddress, ResourceLocator};
pub use narrator::{NarratorSelection, NarratorSource, SharedNarrators, NO_NARRATOR};
pub use observer::{EngineNotification, Observers};
pub use prefetch::{lookahead, NoopWarmer, Prefetcher, ResourceWarmer};
pub use sink::{AudioSink, LoadId, SinkEvent, SinkEventKind, SinkEventSender};
pub use state::{PlaybackSnapshot, PlaybackState, PlaybackStatus, Stage};
pub use tracker::PositionTracker;
