use serde::{Deserialize, Serialize};

/// Target condition for a remote resource.
///
/// `Present` converges toward the supplied spec (create or update);
/// `Absent` removes the resource if it exists. Requesting `Absent` for a
/// resource that does not exist is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

impl std::str::FromStr for DesiredState {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(crate::CoreError::invalid_spec(format!(
                "unknown state \"{other}\" (expected present or absent)"
            ))),
        }
    }
}
