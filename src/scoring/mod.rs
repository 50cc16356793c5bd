pub mod engine;
pub mod recompute;

pub use engine::{calculate_points, score_participation, RuleContribution, ScoreBreakdown, ScoreResult};
pub use recompute::recalculate_all;
