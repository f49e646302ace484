//! In-memory participant directory
//!
//! Holds the resolved membership of every group. Built by the CSV readers and
//! consulted by the strategies for ledger creation and display names.

use crate::core::traits::ParticipantSource;
use crate::types::{GroupId, Participant, ValidationError};
use std::collections::BTreeMap;

/// Participants per group, in insertion order
#[derive(Debug, Clone, Default)]
pub struct GroupDirectory {
    groups: BTreeMap<GroupId, Vec<Participant>>,
}

impl GroupDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant to a group
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateParticipant`] if the id is already a
    /// member of the group; the existing entry is kept.
    pub fn insert(&mut self, group: &str, participant: Participant) -> Result<(), ValidationError> {
        let members = self.groups.entry(group.to_string()).or_default();

        if members.iter().any(|member| member.id == participant.id) {
            return Err(ValidationError::DuplicateParticipant { id: participant.id });
        }

        members.push(participant);
        Ok(())
    }

    /// Members of a group, empty if the group is unknown
    pub fn members(&self, group: &str) -> &[Participant] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Display name of a participant, falling back to the id
    pub fn display_name<'a>(&'a self, group: &str, id: &'a str) -> &'a str {
        self.members(group)
            .iter()
            .find(|member| member.id == id)
            .map(|member| member.name.as_str())
            .unwrap_or(id)
    }

    /// Groups and their members, ordered by group id
    pub fn iter(&self) -> impl Iterator<Item = (&GroupId, &[Participant])> {
        self.groups
            .iter()
            .map(|(group, members)| (group, members.as_slice()))
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the directory holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl ParticipantSource for GroupDirectory {
    fn participants(&self, group: &str) -> Vec<Participant> {
        self.members(group).to_vec()
    }

    fn groups(&self) -> Vec<GroupId> {
        self.groups.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> GroupDirectory {
        let mut directory = GroupDirectory::new();
        directory.insert("trip", Participant::new("u1", "Max")).unwrap();
        directory.insert("trip", Participant::new("u2", "Erika")).unwrap();
        directory.insert("flat", Participant::new("u1", "Max")).unwrap();
        directory
    }

    #[test]
    fn test_members_per_group() {
        let directory = directory();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.members("trip").len(), 2);
        assert_eq!(directory.members("flat").len(), 1);
        assert!(directory.members("unknown").is_empty());
    }

    #[test]
    fn test_duplicate_in_group_is_rejected_and_first_kept() {
        let mut directory = directory();
        let result = directory.insert("trip", Participant::new("u1", "Maximilian"));

        assert_eq!(
            result,
            Err(ValidationError::DuplicateParticipant {
                id: "u1".to_string()
            })
        );
        assert_eq!(directory.display_name("trip", "u1"), "Max");
        assert_eq!(directory.members("trip").len(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let directory = directory();
        assert_eq!(directory.display_name("trip", "u2"), "Erika");
        assert_eq!(directory.display_name("trip", "ghost"), "ghost");
        assert_eq!(directory.display_name("nowhere", "u1"), "u1");
    }

    #[test]
    fn test_iter_yields_groups_in_order() {
        let directory = directory();
        let sizes: Vec<(&str, usize)> = directory
            .iter()
            .map(|(group, members)| (group.as_str(), members.len()))
            .collect();
        assert_eq!(sizes, vec![("flat", 1), ("trip", 2)]);
    }

    #[test]
    fn test_groups_are_sorted() {
        let directory = directory();
        assert_eq!(directory.groups(), vec!["flat".to_string(), "trip".to_string()]);
    }
}
