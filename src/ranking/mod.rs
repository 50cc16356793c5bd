pub mod collate;
pub mod engine;
pub mod stats;

pub use collate::compare_names;
pub use engine::{calculate_rankings, compare_rankings, Ranking};
pub use stats::{calculate_user_stats, UserStats};
