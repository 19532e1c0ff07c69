//! # Slint Block Editor Library
//!
//! Layout and connection engine for snap-together block editors: draggable
//! blocks joined top-to-bottom and left-to-right through clips, nested inside
//! each other through slots, and wired together by free-floating pipes.
//!
//! ## Features
//!
//! - **Arena Model** - Blocks, slots, clips and pipes live in one [`BlockGraph`]
//!   and refer to each other through typed handles
//! - **Self-Sizing Layout** - Inserted blocks size their slot, slots size their
//!   owner, chained blocks follow their neighbors
//! - **Snap Resolution** - Releasing a block next to a complementary clip links
//!   or inserts it
//! - **Chain Execution** - Block operations run in chain order
//! - **Pipes** (feature `pipes`, default) - Validated output-to-input lines
//! - **Buttons** (feature `buttons`) - Keyboard-free test buttons
//!
//! ## Quick Start
//!
//! ```
//! use slint_block_editor::{BlockEditorController, Point, PressTarget};
//!
//! let ctrl = BlockEditorController::new();
//! let top = ctrl.spawn("b1_slot", Point::new(0.0, 0.0)).unwrap();
//! let bot = ctrl.spawn("tb2_slot1_op", Point::new(200.0, 200.0)).unwrap();
//!
//! // Drag the second block right under the first one.
//! ctrl.press(200.0, 200.0, PressTarget::Block(bot));
//! ctrl.pointer_moved(5.0, 104.0);
//! ctrl.release(5.0, 104.0);
//!
//! assert_eq!(ctrl.graph().borrow().block(bot).up, Some(top));
//! ```
//!
//! ## Modules
//!
//! - [`graph`] / [`model`] - Entities and construction rules
//! - [`layout`] - Fitting, equal heights and chain positioning
//! - [`hit_test`] - Connector boxes and collision windows
//! - [`resolve`] - Linking, slot insertion and release
//! - [`execution`] - Chain traversal and operation runs
//! - [`controller`] - Pointer-driven interaction
//! - [`palette`] - Built-in block factories

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod registry;
pub mod graph;
pub mod layout;
pub mod resolve;
pub mod execution;
#[cfg(feature = "pipes")]
pub mod links;
pub mod palette;
pub mod controller;
#[cfg(feature = "buttons")]
pub mod buttons;

// Re-export types and functions
pub use config::EditorConfig;
pub use error::{Diagnostics, EditorError};
pub use geometry::{Point, Rect, ScreenTransform, Size};
pub use model::{
    Block, BlockId, Child, ChildId, Clip, ClipId, ClipKind, ClipOwner, ConnectorFamily,
    ConnectorKind, ConnectorState, Element, Operation, Operator, OperatorId, Pipe, PipeBlock,
    PipeBlockId, PipeId, PipeKind, RoleStatus, Slot, SlotId, Text, TextId,
};
pub use registry::ConnectorRegistry;
pub use graph::{parse_hex_color, BlockGraph};
pub use hit_test::{
    clip_box, find_box_at, find_collision, find_pipe_target_at, find_snap_candidate,
    first_collision, pipe_block_box, Collision, ConnectorGeometry, SimpleConnectorGeometry,
    SnapWindow, COLLISION_ORDER,
};
pub use execution::{run_steps, ExecutionReport};
#[cfg(feature = "pipes")]
pub use links::{
    // Pipe validation framework
    PipeValidator, BasicPipeValidator, NoDuplicatesValidator, MaxPipesValidator,
    CompositeValidator, ValidationResult, PipeValidationError, default_validator, validate_pipe,
};
pub use palette::{BlockFactory, Palette};
pub use controller::{BlockEditorController, PressTarget, ReleaseOutcome};
#[cfg(feature = "buttons")]
pub use buttons::{ButtonAction, ButtonPanel, ButtonResult};
