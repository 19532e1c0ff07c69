//! High-level controller for block editor applications.
//!
//! The [`BlockEditorController`] owns the graph, the viewport transform and
//! the current drag, and turns raw press/move/release events into layout
//! and connection changes.
//!
//! # Example
//!
//! ```ignore
//! use slint_block_editor::{BlockEditorController, BlockId, PressTarget};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = BlockEditorController::new();
//!
//!     window.on_compute_pipe_path(ctrl.pipe_path_callback());
//!     window.on_block_pressed({
//!         let ctrl = ctrl.clone();
//!         move |id, x, y| ctrl.press(x, y, PressTarget::Block(BlockId(id as usize)))
//!     });
//!     window.on_pointer_moved({
//!         let ctrl = ctrl.clone();
//!         move |x, y| ctrl.pointer_moved(x, y)
//!     });
//!     window.on_pointer_released({
//!         let ctrl = ctrl.clone();
//!         move |x, y| {
//!             ctrl.release(x, y);
//!         }
//!     });
//!     window.on_update_viewport({
//!         let ctrl = ctrl.clone();
//!         move |zoom, pan_x, pan_y| ctrl.set_viewport(zoom, pan_x, pan_y)
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::execution::{run_steps, ExecutionReport};
use crate::geometry::{Point, Rect, ScreenTransform};
use crate::graph::BlockGraph;
use crate::hit_test::Collision;
use crate::model::{BlockId, PipeId};
use crate::palette::Palette;
use slint::SharedString;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "pipes")]
use crate::links::{default_validator, PipeValidator};
#[cfg(feature = "pipes")]
use crate::model::PipeBlockId;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Block(BlockId),
    #[cfg(feature = "pipes")]
    PipeOutput(PipeBlockId),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Block { id: BlockId, grab_offset: Point },
    #[cfg(feature = "pipes")]
    Pipe { pipe: PipeId },
}

/// What a release did.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// Nothing was being dragged.
    Idle,
    /// A block was dropped; `connections` lists the links it committed.
    Block {
        block: BlockId,
        connections: Vec<Collision>,
        report: Option<ExecutionReport>,
    },
    #[cfg(feature = "pipes")]
    PipeCommitted(PipeId),
    #[cfg(feature = "pipes")]
    PipeDiscarded,
}

/// Controller that manages the block graph and provides callback
/// implementations.
///
/// Pointer positions come in screen space and are mapped to world space
/// through the current [`ScreenTransform`]. Block operations run after the
/// graph borrow is released, so they may read the graph through
/// [`graph`](Self::graph).
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct BlockEditorController {
    graph: Rc<RefCell<BlockGraph>>,
    palette: Rc<RefCell<Palette>>,
    transform: Rc<RefCell<ScreenTransform>>,
    drag: Rc<RefCell<DragState>>,
    run_chain_on_release: Rc<RefCell<bool>>,
    #[cfg(feature = "pipes")]
    validator: Rc<RefCell<Box<dyn PipeValidator>>>,
}

impl Default for BlockEditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEditorController {
    /// Create a controller with default layout constants and the built-in
    /// palette.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let run_chain_on_release = config.run_chain_on_release;
        Self {
            graph: Rc::new(RefCell::new(BlockGraph::with_config(config))),
            palette: Rc::new(RefCell::new(Palette::with_builtins())),
            transform: Rc::new(RefCell::new(ScreenTransform::identity())),
            drag: Rc::new(RefCell::new(DragState::Idle)),
            run_chain_on_release: Rc::new(RefCell::new(run_chain_on_release)),
            #[cfg(feature = "pipes")]
            validator: Rc::new(RefCell::new(Box::new(default_validator()))),
        }
    }

    /// Get access to the graph.
    pub fn graph(&self) -> Rc<RefCell<BlockGraph>> {
        self.graph.clone()
    }

    pub fn palette(&self) -> Rc<RefCell<Palette>> {
        self.palette.clone()
    }

    /// Set viewport state: zoom, pan_x, pan_y.
    pub fn set_viewport(&self, zoom: f32, pan_x: f32, pan_y: f32) {
        *self.transform.borrow_mut() = ScreenTransform::from_viewport(zoom, pan_x, pan_y);
    }

    pub fn set_transform(&self, transform: ScreenTransform) {
        *self.transform.borrow_mut() = transform;
    }

    pub fn transform(&self) -> ScreenTransform {
        *self.transform.borrow()
    }

    pub fn screen_to_world(&self, x: f32, y: f32) -> Point {
        self.transform.borrow().to_world(x, y)
    }

    /// Run the chain containing a dropped block (default: from config).
    pub fn set_run_chain_on_release(&self, enabled: bool) {
        *self.run_chain_on_release.borrow_mut() = enabled;
    }

    /// Replace the validator applied when a pipe is released.
    #[cfg(feature = "pipes")]
    pub fn set_validator<V: PipeValidator + 'static>(&self, validator: V) {
        *self.validator.borrow_mut() = Box::new(validator);
    }

    /// The block currently being dragged, if any.
    pub fn dragged_block(&self) -> Option<BlockId> {
        match *self.drag.borrow() {
            DragState::Block { id, .. } => Some(id),
            _ => None,
        }
    }

    // === Pointer handlers ===

    /// Start a drag.
    ///
    /// A pressed block leaves its slot and its `up`/`left` neighbors, keeps
    /// its absolute position and comes to the front together with everything
    /// hanging off it.
    pub fn press(&self, x: f32, y: f32, target: PressTarget) {
        let pointer = self.screen_to_world(x, y);
        let state = match target {
            PressTarget::Block(id) => self.grab_block(id, pointer),
            #[cfg(feature = "pipes")]
            PressTarget::PipeOutput(output) => {
                let mut graph = self.graph.borrow_mut();
                match graph.begin_pipe(output) {
                    Some(pipe) => {
                        graph.drag_pipe(pipe, pointer);
                        DragState::Pipe { pipe }
                    }
                    None => DragState::Idle,
                }
            }
            PressTarget::Nothing => DragState::Idle,
        };
        *self.drag.borrow_mut() = state;
    }

    fn grab_block(&self, id: BlockId, pointer: Point) -> DragState {
        let mut graph = self.graph.borrow_mut();
        if graph.get_block(id).is_none() {
            return DragState::Idle;
        }

        let absolute = graph.absolute_origin(id);
        if let Some(slot) = graph.block(id).parent {
            graph.pop_out(slot, id);
        }
        graph.detach(id);
        graph.set_position(id, absolute);
        graph.bring_to_front(id);
        graph.make_all_equal_height(id);
        log::debug!("grabbed {id} at {:?}", absolute);

        DragState::Block { id, grab_offset: pointer - absolute }
    }

    pub fn pointer_moved(&self, x: f32, y: f32) {
        let pointer = self.screen_to_world(x, y);
        let state = *self.drag.borrow();
        match state {
            DragState::Idle => {}
            DragState::Block { id, grab_offset } => {
                self.graph.borrow_mut().set_position(id, pointer - grab_offset);
            }
            #[cfg(feature = "pipes")]
            DragState::Pipe { pipe } => self.graph.borrow_mut().drag_pipe(pipe, pointer),
        }
    }

    /// Finish a drag: snap a block (and optionally run its chain) or commit
    /// or discard a pipe.
    pub fn release(&self, x: f32, y: f32) -> ReleaseOutcome {
        let pointer = self.screen_to_world(x, y);
        let state = std::mem::replace(&mut *self.drag.borrow_mut(), DragState::Idle);

        match state {
            DragState::Idle => ReleaseOutcome::Idle,
            DragState::Block { id, grab_offset } => {
                let (connections, steps) = {
                    let mut graph = self.graph.borrow_mut();
                    graph.set_position(id, pointer - grab_offset);
                    let connections = graph.check_all_collision(id);
                    let steps = (*self.run_chain_on_release.borrow())
                        .then(|| graph.execution_steps(graph.chain_origin(id)));
                    (connections, steps)
                };
                ReleaseOutcome::Block { block: id, connections, report: steps.map(run_steps) }
            }
            #[cfg(feature = "pipes")]
            DragState::Pipe { pipe } => {
                let validator = self.validator.borrow();
                match self.graph.borrow_mut().release_pipe(pipe, pointer, &**validator) {
                    Ok(Some(committed)) => ReleaseOutcome::PipeCommitted(committed),
                    Ok(None) | Err(_) => ReleaseOutcome::PipeDiscarded,
                }
            }
        }
    }

    pub fn hover_enter(&self, block: BlockId) {
        self.highlight(block, true);
    }

    pub fn hover_leave(&self, block: BlockId) {
        self.highlight(block, false);
    }

    /// Unknown or removed blocks are ignored.
    fn highlight(&self, block: BlockId, hovered: bool) {
        let mut graph = self.graph.borrow_mut();
        if graph.get_block(block).is_none() {
            return;
        }
        graph.highlight_connected(block, hovered);
    }

    // === Direct actions ===

    /// Context-menu removal of a pipe.
    pub fn remove_pipe(&self, pipe: PipeId) -> bool {
        self.graph.borrow_mut().remove_pipe(pipe)
    }

    pub fn remove_block(&self, block: BlockId) {
        let mut drag = self.drag.borrow_mut();
        if matches!(*drag, DragState::Block { id, .. } if id == block) {
            *drag = DragState::Idle;
        }
        self.graph.borrow_mut().remove_block(block);
    }

    /// Instantiate a palette entry at a world position.
    pub fn spawn(&self, entry: &str, at: Point) -> Result<BlockId, EditorError> {
        self.palette.borrow_mut().spawn(&mut self.graph.borrow_mut(), entry, at)
    }

    /// Run the whole chain containing `block`.
    pub fn run_chain(&self, block: BlockId) -> ExecutionReport {
        let steps = {
            let graph = self.graph.borrow();
            graph.execution_steps(graph.chain_origin(block))
        };
        run_steps(steps)
    }

    // === Callback factories ===

    /// Returns a callback for `compute-pipe-path`.
    ///
    /// Produces screen-space `M x1 y1 L x2 y2` commands; unknown pipes give an
    /// empty string.
    #[cfg(feature = "pipes")]
    pub fn pipe_path_callback(&self) -> impl Fn(i32) -> SharedString {
        let graph = self.graph.clone();
        let transform = self.transform.clone();
        move |pipe| {
            let Ok(index) = usize::try_from(pipe) else {
                return SharedString::default();
            };
            graph
                .borrow()
                .pipe_path(PipeId(index), &transform.borrow())
                .unwrap_or_default()
                .into()
        }
    }

    /// Returns a callback for `block-rect`: the block's outer box in screen
    /// space, or an empty rect for unknown blocks.
    pub fn block_rect_callback(&self) -> impl Fn(i32) -> Rect {
        let graph = self.graph.clone();
        let transform = self.transform.clone();
        move |block| {
            let graph = graph.borrow();
            let Some(id) = usize::try_from(block).ok().map(BlockId) else {
                return Rect::default();
            };
            if graph.get_block(id).is_none() {
                return Rect::default();
            }
            let rect = graph.block_rect(id);
            let t = transform.borrow();
            let origin = t.to_screen(rect.origin());
            Rect::new(origin.x, origin.y, rect.width * t.scale_x, rect.height * t.scale_y)
        }
    }

    /// Returns a callback for `block-name`.
    pub fn block_name_callback(&self) -> impl Fn(i32) -> SharedString {
        let graph = self.graph.clone();
        move |block| {
            let graph = graph.borrow();
            usize::try_from(block)
                .ok()
                .and_then(|index| graph.get_block(BlockId(index)))
                .map(|b| SharedString::from(b.name.as_str()))
                .unwrap_or_default()
        }
    }
}
