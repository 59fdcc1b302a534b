use std::fmt;

/// Errors raised when a standings snapshot or a calculation request is inconsistent.
///
/// The sentinel values [`CLINCHED`](crate::constants::CLINCHED) and
/// [`IMPOSSIBLE`](crate::constants::IMPOSSIBLE) are ordinary results and never
/// appear here.
#[derive(Debug)]
pub enum StandingsError {
    /// A referenced team id has no record in the snapshot
    MissingTeamData { team_id: String },
    /// A record contradicts the season constants or its own totals
    MalformedRecord { team_id: String, reason: String },
    /// A rank-based calculation asked for more teams than the snapshot holds
    InsufficientStandings { required: usize, available: usize },
    /// Season configuration is unusable
    InvalidConfig { reason: String },
    /// Input document could not be decoded
    Parse(serde_json::Error),
}

impl StandingsError {
    pub(crate) fn malformed(team_id: &str, reason: impl Into<String>) -> Self {
        StandingsError::MalformedRecord {
            team_id: team_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(team_id: &str) -> Self {
        StandingsError::MissingTeamData {
            team_id: team_id.to_string(),
        }
    }
}

impl fmt::Display for StandingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandingsError::MissingTeamData { team_id } => {
                write!(f, "no standings record for team '{}'", team_id)
            }
            StandingsError::MalformedRecord { team_id, reason } => {
                write!(f, "malformed record for team '{}': {}", team_id, reason)
            }
            StandingsError::InsufficientStandings {
                required,
                available,
            } => write!(
                f,
                "calculation needs {} ranked teams but only {} are available",
                required, available
            ),
            StandingsError::InvalidConfig { reason } => {
                write!(f, "invalid season configuration: {}", reason)
            }
            StandingsError::Parse(e) => write!(f, "failed to parse input: {}", e),
        }
    }
}

impl std::error::Error for StandingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StandingsError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StandingsError {
    fn from(e: serde_json::Error) -> Self {
        StandingsError::Parse(e)
    }
}

#[cfg(feature = "python")]
impl From<StandingsError> for pyo3::PyErr {
    fn from(e: StandingsError) -> Self {
        pyo3::exceptions::PyValueError::new_err(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StandingsError>;
