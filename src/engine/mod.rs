//! Prediction display engine.
//!
//! Pure functions from fixtures, predictions and a live-score snapshot to
//! display rows: UK day bucket, prediction chips, and chip colours once a
//! match is final. No I/O and no hidden state.

pub mod bucket;
pub mod display;
pub mod filter;
pub mod labels;
pub mod outcome;
pub mod status;

pub use bucket::{classify, BoardView, DateBucket, ViewSelection, UK_TIMEZONE};
pub use display::{DisplayEngine, DisplayLabel, MatchDisplay};
pub use filter::{filter_leagues, PredictionFilter};
pub use labels::{derive_labels, pick_summary, DoubleChance, LabelKind, PredictionLabel};
pub use outcome::{colorize, ColorClass, MatchPhase, Verdict};
