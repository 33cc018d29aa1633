use serde::Deserialize;
use serde::Serialize;

/// Partition of a diagram by critical pair type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Pairs touching a local minimum.
    Min,
    /// Pairs linking a 1-saddle and a 2-saddle.
    Sad,
    /// Pairs touching a local maximum, including the global min-max pair.
    Max,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Min, Kind::Sad, Kind::Max];
    pub const fn index(&self) -> usize {
        match self {
            Kind::Min => 0,
            Kind::Sad => 1,
            Kind::Max => 2,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Min => write!(f, "min"),
            Kind::Sad => write!(f, "sad"),
            Kind::Max => write!(f, "max"),
        }
    }
}

/// Which partitions the caller wants clustered.
///
/// Built from the integer convention 0 = min-saddle only, 1 = saddle-saddle only,
/// 2 = saddle-max only, anything else = all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selector {
    MinSaddle,
    SaddleSaddle,
    SaddleMax,
    #[default]
    All,
}

impl Selector {
    pub fn selects(&self, kind: Kind) -> bool {
        match self {
            Selector::MinSaddle => kind == Kind::Min,
            Selector::SaddleSaddle => kind == Kind::Sad,
            Selector::SaddleMax => kind == Kind::Max,
            Selector::All => true,
        }
    }
}

impl From<i32> for Selector {
    fn from(n: i32) -> Self {
        match n {
            0 => Selector::MinSaddle,
            1 => Selector::SaddleSaddle,
            2 => Selector::SaddleMax,
            _ => Selector::All,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::MinSaddle => write!(f, "min-sad pairs"),
            Selector::SaddleSaddle => write!(f, "sad-sad pairs"),
            Selector::SaddleMax => write!(f, "sad-max pairs"),
            Selector::All => write!(f, "all pairs"),
        }
    }
}

/// Set of partitions that take part in matching and clustering.
///
/// A disabled kind is skipped everywhere: no points are collected for it,
/// no matcher runs on it, and it contributes nothing to any distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Active([bool; 3]);

impl Active {
    pub fn from_selector(selector: Selector) -> Self {
        Self(Kind::ALL.map(|k| selector.selects(k)))
    }
    pub fn contains(&self, kind: Kind) -> bool {
        self.0[kind.index()]
    }
    pub fn disable(&mut self, kind: Kind) {
        self.0[kind.index()] = false;
    }
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|b| *b)
    }
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}
