use crate::Energy;
use serde::Deserialize;
use serde::Serialize;

/// One matched pair of a diagram transport plan.
///
/// `source` indexes the bidder diagram and `target` the goods diagram.
/// `None` on either side stands for the diagonal, i.e. the other point is
/// destroyed (or created). `cost` is already raised to the order p.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    pub source: Option<usize>,
    pub target: Option<usize>,
    pub cost: Energy,
}

impl From<(Option<usize>, Option<usize>, Energy)> for Matching {
    fn from((source, target, cost): (Option<usize>, Option<usize>, Energy)) -> Self {
        Self {
            source,
            target,
            cost,
        }
    }
}
