use super::frame::{BasinId, Frame};

/// The outcome of one side (forward or time-reversed) of a shooting point.
///
/// `commit` is `None` when the trajectory did not reach any basin within the
/// simulated window; that is a valid non-committing outcome, not an error.
/// `frames` always carries the two intermediate configurations sampled at
/// +1Δt and +2Δt from t=0 on this side. A side that errored before producing
/// them surfaces as an engine error instead of a `TrajectoryOutcome`.
#[derive(Debug, Clone)]
pub struct TrajectoryOutcome {
    pub commit: Option<BasinId>,
    pub frames: [Frame; 2],
}

/// The result of one shooting point: a forward and a time-reversed trajectory
/// launched concurrently from the same configuration.
#[derive(Debug, Clone)]
pub struct ShootingResult {
    pub forward: TrajectoryOutcome,
    pub reverse: TrajectoryOutcome,
}

impl ShootingResult {
    /// True iff both sides committed to some basin.
    pub fn both_committed(&self) -> bool {
        self.forward.commit.is_some() && self.reverse.commit.is_some()
    }
}
