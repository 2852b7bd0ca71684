pub mod board;
pub mod live_scores;
pub mod midnight;
pub mod periodic;

pub use board::{BoardEvent, BoardWorker};
pub use live_scores::LiveScoresPoller;
pub use midnight::MidnightWatcher;
pub use periodic::PeriodicTask;
