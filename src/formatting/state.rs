// src/formatting/state.rs
//! Immutable render state with pure transitions.
//!
//! One value is threaded through the blocks of a single sibling run; each
//! nesting level starts from its own fresh counter.

use crate::constants::BLOCK_MAX_RENDER_DEPTH;
use crate::model::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderState {
    /// Number of the most recent numbered item in the current run; zero
    /// outside a numbered run.
    list_counter: usize,
    /// Nesting depth of the blocks being rendered; top level is zero.
    depth: usize,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for rendering `block`: a numbered item advances the counter,
    /// anything else resets it.
    pub fn observe(self, block: &Block) -> Self {
        let list_counter = if block.is_numbered_list_item() {
            self.list_counter + 1
        } else {
            0
        };
        Self {
            list_counter,
            ..self
        }
    }

    /// State for the first child of the current block.
    pub fn enter_children(self) -> Self {
        Self {
            list_counter: 0,
            depth: self.depth + 1,
        }
    }

    pub fn list_number(&self) -> usize {
        self.list_counter
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn depth_limit_reached(&self) -> bool {
        self.depth >= BLOCK_MAX_RENDER_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counter_resets_on_non_numbered_items() {
        let blocks = [
            Block::bulleted("a"),
            Block::numbered("b"),
            Block::numbered("c"),
            Block::bulleted("d"),
            Block::numbered("e"),
        ];

        let mut state = RenderState::new();
        let mut numbers = Vec::new();
        for block in &blocks {
            state = state.observe(block);
            numbers.push(state.list_number());
        }

        assert_eq!(numbers, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn children_start_a_fresh_counter_one_level_down() {
        let parent = RenderState::new()
            .observe(&Block::numbered("x"))
            .observe(&Block::numbered("y"));
        assert_eq!(parent.list_number(), 2);

        let child = parent.enter_children();
        assert_eq!(child.list_number(), 0);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.observe(&Block::numbered("z")).list_number(), 1);

        // The parent's value is untouched.
        assert_eq!(parent.list_number(), 2);
    }

    #[test]
    fn depth_limit() {
        let mut state = RenderState::new();
        for _ in 0..BLOCK_MAX_RENDER_DEPTH {
            assert!(!state.depth_limit_reached());
            state = state.enter_children();
        }
        assert!(state.depth_limit_reached());
    }
}
