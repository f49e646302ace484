//! Participant-related types for the settlement engine
//!
//! Participants are identified by a stable id. The display name is carried
//! along for reports only and never takes part in any computation.

/// Participant identifier
///
/// A stable, unique id within a group (for example a user name such as `"karl"`).
pub type ParticipantId = String;

/// Group identifier
///
/// Every participant and expense belongs to exactly one group; groups are
/// settled independently of each other.
pub type GroupId = String;

/// A member of a group who can pay for or share in expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique, stable identifier
    pub id: ParticipantId,

    /// Display name (reports only)
    pub name: String,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}
