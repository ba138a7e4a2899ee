//! Turn rotation for one search invocation
//!
//! A rotation is the ordered list of participants the search cycles through:
//! the searching agent first (the maximizer), then each modeled adversary.
//! One full pass through the list is one unit of depth.
//!
//! Adversaries are modeled as independent minimizers. Each one minimizes the
//! searching agent's utility on its own turn with no joint planning between
//! them. This is an approximation of real opponents, not a guarantee about
//! their play.

use crate::observation::AgentIndex;

/// Ordered participants for one search call; index 0 is the maximizer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotation {
    participants: Vec<AgentIndex>,
}

impl Rotation {
    pub fn new(maximizer: AgentIndex, minimizers: &[AgentIndex]) -> Self {
        let mut participants = Vec::with_capacity(minimizers.len() + 1);
        participants.push(maximizer);
        participants.extend_from_slice(minimizers);
        Self { participants }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn maximizer(&self) -> AgentIndex {
        self.participants[0]
    }

    /// Modeled adversaries, in rotation order
    pub fn minimizers(&self) -> &[AgentIndex] {
        &self.participants[1..]
    }

    /// Participant acting at `cursor`
    pub fn participant(&self, cursor: usize) -> AgentIndex {
        self.participants[cursor]
    }

    pub fn is_maximizer(&self, cursor: usize) -> bool {
        cursor == 0
    }

    /// Cursor and remaining depth after the participant at `cursor` acts
    ///
    /// Depth drops by exactly one when the cursor wraps back to the maximizer.
    pub fn advance(&self, cursor: usize, depth: u32) -> (usize, u32) {
        let next = cursor + 1;
        if next >= self.participants.len() {
            (0, depth.saturating_sub(1))
        } else {
            (next, depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_order() {
        let rotation = Rotation::new(0, &[1, 3]);
        assert_eq!(rotation.len(), 3);
        assert_eq!(rotation.maximizer(), 0);
        assert_eq!(rotation.minimizers(), &[1, 3]);
        assert_eq!(rotation.participant(2), 3);
        assert!(rotation.is_maximizer(0));
        assert!(!rotation.is_maximizer(1));
    }

    #[test]
    fn test_advance_wraps_and_decrements() {
        let rotation = Rotation::new(2, &[1, 3]);
        assert_eq!(rotation.advance(0, 2), (1, 2));
        assert_eq!(rotation.advance(1, 2), (2, 2));
        assert_eq!(rotation.advance(2, 2), (0, 1));
    }

    #[test]
    fn test_traversal_repeats_depth_times() {
        let rotation = Rotation::new(0, &[1]);
        let mut order = Vec::new();
        let (mut cursor, mut depth) = (0, 3);
        while depth > 0 {
            order.push(rotation.participant(cursor));
            let (next, next_depth) = rotation.advance(cursor, depth);
            cursor = next;
            depth = next_depth;
        }
        assert_eq!(order, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_single_participant_decrements_every_step() {
        let rotation = Rotation::new(4, &[]);
        assert_eq!(rotation.advance(0, 2), (0, 1));
        assert_eq!(rotation.advance(0, 0), (0, 0));
    }
}
