//! Engine-owned connector registries.
//!
//! The collision detector scans these in insertion order and takes the first
//! hit, so registration order is part of the observable behavior.

use crate::model::{ClipId, ClipKind, PipeBlockId, PipeKind};
use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct ConnectorRegistry {
    top_clips_in: IndexSet<ClipId>,
    bot_clips_out: IndexSet<ClipId>,
    left_clips_out: IndexSet<ClipId>,
    right_clips_in: IndexSet<ClipId>,
    pipes_in: IndexSet<PipeBlockId>,
    pipes_out: IndexSet<PipeBlockId>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn clip_set(&self, kind: ClipKind) -> &IndexSet<ClipId> {
        match kind {
            ClipKind::TopIn => &self.top_clips_in,
            ClipKind::BotOut => &self.bot_clips_out,
            ClipKind::LeftOut => &self.left_clips_out,
            ClipKind::RightIn => &self.right_clips_in,
        }
    }

    fn clip_set_mut(&mut self, kind: ClipKind) -> &mut IndexSet<ClipId> {
        match kind {
            ClipKind::TopIn => &mut self.top_clips_in,
            ClipKind::BotOut => &mut self.bot_clips_out,
            ClipKind::LeftOut => &mut self.left_clips_out,
            ClipKind::RightIn => &mut self.right_clips_in,
        }
    }

    fn pipe_set_mut(&mut self, kind: PipeKind) -> &mut IndexSet<PipeBlockId> {
        if kind.is_input() {
            &mut self.pipes_in
        } else {
            &mut self.pipes_out
        }
    }

    pub fn register_clip(&mut self, kind: ClipKind, clip: ClipId) {
        self.clip_set_mut(kind).insert(clip);
    }

    /// Remove a clip, keeping the order of the remaining entries.
    pub fn unregister_clip(&mut self, kind: ClipKind, clip: ClipId) -> bool {
        self.clip_set_mut(kind).shift_remove(&clip)
    }

    pub fn register_pipe_block(&mut self, kind: PipeKind, pipe_block: PipeBlockId) {
        self.pipe_set_mut(kind).insert(pipe_block);
    }

    pub fn unregister_pipe_block(&mut self, kind: PipeKind, pipe_block: PipeBlockId) -> bool {
        self.pipe_set_mut(kind).shift_remove(&pipe_block)
    }

    /// Registered clips of one kind, oldest first.
    pub fn clips(&self, kind: ClipKind) -> impl Iterator<Item = ClipId> + '_ {
        self.clip_set(kind).iter().copied()
    }

    pub fn pipe_inputs(&self) -> impl Iterator<Item = PipeBlockId> + '_ {
        self.pipes_in.iter().copied()
    }

    pub fn pipe_outputs(&self) -> impl Iterator<Item = PipeBlockId> + '_ {
        self.pipes_out.iter().copied()
    }

    pub fn contains_clip(&self, kind: ClipKind, clip: ClipId) -> bool {
        self.clip_set(kind).contains(&clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clips_iterate_in_registration_order() {
        let mut registry = ConnectorRegistry::new();
        registry.register_clip(ClipKind::TopIn, ClipId(5));
        registry.register_clip(ClipKind::TopIn, ClipId(2));
        registry.register_clip(ClipKind::TopIn, ClipId(9));

        let order: Vec<_> = registry.clips(ClipKind::TopIn).collect();
        assert_eq!(order, vec![ClipId(5), ClipId(2), ClipId(9)]);
        assert_eq!(registry.clips(ClipKind::BotOut).count(), 0);
    }

    #[test]
    fn test_unregister_preserves_order() {
        let mut registry = ConnectorRegistry::new();
        for id in [1, 2, 3] {
            registry.register_clip(ClipKind::RightIn, ClipId(id));
        }

        assert!(registry.unregister_clip(ClipKind::RightIn, ClipId(2)));
        assert!(!registry.unregister_clip(ClipKind::RightIn, ClipId(2)));

        let order: Vec<_> = registry.clips(ClipKind::RightIn).collect();
        assert_eq!(order, vec![ClipId(1), ClipId(3)]);
    }

    #[test]
    fn test_pipe_blocks_split_by_direction() {
        let mut registry = ConnectorRegistry::new();
        registry.register_pipe_block(PipeKind::TopIn, PipeBlockId(0));
        registry.register_pipe_block(PipeKind::BotOut, PipeBlockId(1));
        registry.register_pipe_block(PipeKind::LeftIn, PipeBlockId(2));

        assert_eq!(
            registry.pipe_inputs().collect::<Vec<_>>(),
            vec![PipeBlockId(0), PipeBlockId(2)]
        );
        assert_eq!(registry.pipe_outputs().collect::<Vec<_>>(), vec![PipeBlockId(1)]);
    }
}
