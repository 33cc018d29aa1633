use crate::Energy;
use serde::Deserialize;
use serde::Serialize;

/// Order p of the Wasserstein distance.
///
/// Costs are accumulated in p-th power form and only rooted when a distance
/// is reported. For p = ∞ the accumulation is a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Order {
    W1,
    #[default]
    W2,
    Bottleneck,
}

impl Order {
    /// Raises a per-axis gap to the p-th power.
    pub fn pow(&self, x: Energy) -> Energy {
        match self {
            Order::W1 => x,
            Order::W2 => x * x,
            Order::Bottleneck => x,
        }
    }
    /// Inverse of [`Order::pow`] applied to an accumulated cost.
    pub fn root(&self, x: Energy) -> Energy {
        match self {
            Order::W1 => x,
            Order::W2 => x.sqrt(),
            Order::Bottleneck => x,
        }
    }
    /// Accumulates two costs in p-th power form.
    pub fn combine(&self, a: Energy, b: Energy) -> Energy {
        match self {
            Order::W1 | Order::W2 => a + b,
            Order::Bottleneck => a.max(b),
        }
    }
    pub fn is_finite(&self) -> bool {
        !matches!(self, Order::Bottleneck)
    }
}

impl TryFrom<&str> for Order {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim() {
            "1" => Ok(Order::W1),
            "2" => Ok(Order::W2),
            "inf" | "Inf" | "INF" | "∞" => Ok(Order::Bottleneck),
            _ => Err(anyhow::anyhow!("invalid wasserstein order: {}", s)),
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::W1 => write!(f, "1"),
            Order::W2 => write!(f, "2"),
            Order::Bottleneck => write!(f, "inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_orders() {
        assert_eq!(Order::try_from("1").unwrap(), Order::W1);
        assert_eq!(Order::try_from("2").unwrap(), Order::W2);
        assert_eq!(Order::try_from("inf").unwrap(), Order::Bottleneck);
        assert!(Order::try_from("3").is_err());
    }

    #[test]
    fn accumulation_matches_order() {
        assert_eq!(Order::W2.root(Order::W2.combine(9., 16.)), 5.);
        assert_eq!(Order::W1.combine(3., 4.), 7.);
        assert_eq!(Order::Bottleneck.combine(3., 4.), 4.);
    }
}
