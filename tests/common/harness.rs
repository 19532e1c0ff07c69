//! Test harness driving a [`BlockEditorController`] the way a renderer would.
//!
//! Pointer positions are given in screen space; with the default identity
//! viewport they equal world positions.

#![allow(dead_code)]

use super::CallbackTracker;
use slint_block_editor::{
    Block, BlockEditorController, BlockGraph, BlockId, ClipId, ClipKind, Point, PressTarget,
    Rect, ReleaseOutcome, SlotId,
};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub struct EditorHarness {
    pub ctrl: BlockEditorController,
    pub graph: Rc<RefCell<BlockGraph>>,
    pub tracker: CallbackTracker,
}

impl EditorHarness {
    /// A harness that does not run chains on release.
    pub fn new() -> Self {
        let ctrl = BlockEditorController::new();
        ctrl.set_run_chain_on_release(false);
        let graph = ctrl.graph();
        Self { ctrl, graph, tracker: CallbackTracker::new() }
    }

    /// A harness that runs the dropped block's chain on every release.
    pub fn running() -> Self {
        let harness = Self::new();
        harness.ctrl.set_run_chain_on_release(true);
        harness
    }

    pub fn graph(&self) -> Ref<'_, BlockGraph> {
        self.graph.borrow()
    }

    pub fn spawn(&self, entry: &str, x: f32, y: f32) -> BlockId {
        self.ctrl.spawn(entry, Point::new(x, y)).unwrap()
    }

    pub fn block(&self, id: BlockId) -> Block {
        self.graph().block(id).clone()
    }

    pub fn position(&self, id: BlockId) -> Point {
        self.graph().absolute_origin(id)
    }

    pub fn rect(&self, id: BlockId) -> Rect {
        self.graph().block_rect(id)
    }

    pub fn first_slot(&self, id: BlockId) -> SlotId {
        self.graph().block(id).slots().next().unwrap()
    }

    pub fn clip(&self, id: BlockId, kind: ClipKind) -> ClipId {
        self.graph().block(id).clip(kind).unwrap()
    }

    /// Press on the block's origin, move to `to` and release there.
    pub fn drag(&self, id: BlockId, to: Point) -> ReleaseOutcome {
        let from = self.position(id);
        self.ctrl.press(from.x, from.y, PressTarget::Block(id));
        self.ctrl.pointer_moved((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        self.ctrl.pointer_moved(to.x, to.y);
        self.ctrl.release(to.x, to.y)
    }

    /// Move a block so that its `own` clip box lands exactly on `target`.
    pub fn drag_clip_onto(&self, id: BlockId, own: ClipId, target: ClipId) -> ReleaseOutcome {
        let (origin, own_box, target_box) = {
            let graph = self.graph();
            (
                graph.absolute_origin(id),
                slint_block_editor::clip_box(&graph, own),
                slint_block_editor::clip_box(&graph, target),
            )
        };
        let delta = target_box.origin() - own_box.origin();
        self.drag(id, origin + delta)
    }

    /// Record every run of the block's operation in the tracker.
    pub fn track(&self, id: BlockId) {
        self.graph.borrow_mut().set_operation(id, self.tracker.recorder());
    }

    pub fn track_failing(&self, id: BlockId) {
        self.graph.borrow_mut().set_operation(id, self.tracker.failing());
    }
}
