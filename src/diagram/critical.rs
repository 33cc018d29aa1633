use serde::Deserialize;
use serde::Serialize;

/// Morse type of a vertex at one end of a persistence pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CriticalType {
    LocalMin,
    Saddle1,
    Saddle2,
    LocalMax,
}

impl CriticalType {
    pub fn is_extremum(&self) -> bool {
        matches!(self, Self::LocalMin | Self::LocalMax)
    }
    pub fn is_saddle(&self) -> bool {
        matches!(self, Self::Saddle1 | Self::Saddle2)
    }
}

impl TryFrom<&str> for CriticalType {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "min" | "localmin" | "local_minimum" => Ok(Self::LocalMin),
            "saddle1" | "1-saddle" => Ok(Self::Saddle1),
            "saddle2" | "2-saddle" => Ok(Self::Saddle2),
            "max" | "localmax" | "local_maximum" => Ok(Self::LocalMax),
            _ => Err(anyhow::anyhow!("invalid critical type: {}", s)),
        }
    }
}

impl std::fmt::Display for CriticalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalMin => write!(f, "min"),
            Self::Saddle1 => write!(f, "saddle1"),
            Self::Saddle2 => write!(f, "saddle2"),
            Self::LocalMax => write!(f, "max"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!(CriticalType::try_from("Max").unwrap(), CriticalType::LocalMax);
        assert_eq!(CriticalType::try_from("1-saddle").unwrap(), CriticalType::Saddle1);
        assert!(CriticalType::try_from("regular").is_err());
    }

    #[test]
    fn display_roundtrips() {
        for t in [
            CriticalType::LocalMin,
            CriticalType::Saddle1,
            CriticalType::Saddle2,
            CriticalType::LocalMax,
        ] {
            assert_eq!(CriticalType::try_from(t.to_string().as_str()).unwrap(), t);
        }
    }
}
