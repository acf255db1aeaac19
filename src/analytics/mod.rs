pub mod recorder;
pub mod stats;

pub use recorder::ClickRecorder;
pub use stats::StatsAggregator;
