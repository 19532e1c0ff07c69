//! Entity types stored in the [`BlockGraph`](crate::BlockGraph) arena.
//!
//! Entities reference each other through typed index handles. A block's
//! content sequence owns its slots, operators and texts; chain links
//! (`up`/`down`/`left`/`right`) and slot membership are non-owning handles.
//!
//! # Frames
//!
//! Every block has two local frames:
//! - the *block frame*, whose origin is the block's `position` (world space
//!   for top-level blocks, slot space for inserted blocks), and
//! - the *content frame*, offset from the block frame by `content_offset`
//!   (space reserved on the left/top by a left clip or pipe endpoints).
//!
//! Content elements and block-owned connectors are placed in the content
//! frame. A slot's clip and its inserted blocks are placed in the slot frame,
//! whose origin is the slot's position in the owner's content frame.

use crate::geometry::{Point, Size};
use slint::{Color, SharedString};
use std::fmt;
use std::rc::Rc;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle of a [`Block`].
    BlockId,
    "block"
);
handle!(
    /// Handle of a [`Slot`].
    SlotId,
    "slot"
);
handle!(OperatorId, "operator");
handle!(TextId, "text");
handle!(
    /// Handle of a [`Clip`], owned by a block or a slot.
    ClipId,
    "clip"
);
handle!(PipeBlockId, "pipe-block");
handle!(PipeId, "pipe");

/// Operation run when a block is executed.
pub type Operation = Rc<dyn Fn(BlockId) -> anyhow::Result<()>>;

/// State of one connector role on a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectorState<T> {
    #[default]
    Empty,
    Attached(T),
    /// Locked out by a conflicting connector on the same block.
    Disabled,
}

impl<T> ConnectorState<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, ConnectorState::Empty)
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, ConnectorState::Attached(_))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, ConnectorState::Disabled)
    }

    pub fn attached(&self) -> Option<&T> {
        match self {
            ConnectorState::Attached(value) => Some(value),
            _ => None,
        }
    }

    /// Empty → Disabled. Attached and Disabled states are left alone.
    pub fn disable(&mut self) {
        if self.is_empty() {
            *self = ConnectorState::Disabled;
        }
    }
}

impl<T> ConnectorState<Vec<T>> {
    /// Items of a multi-valued role (empty unless attached).
    pub fn items(&self) -> &[T] {
        match self {
            ConnectorState::Attached(items) => items,
            _ => &[],
        }
    }
}

/// Coarse view of a [`ConnectorState`] used by the attach rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStatus {
    Empty,
    Attached,
    Disabled,
}

/// Every connector variant a block can carry. Also names the block's role
/// for that connector (each variant occupies exactly one role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    TopClipIn,
    BotClipOut,
    LeftClipOut,
    RightClipIn,
    TopPipeIn,
    BotPipeOut,
    LeftPipeIn,
    RightPipeOut,
}

impl ConnectorKind {
    pub const ALL: [ConnectorKind; 8] = [
        ConnectorKind::TopClipIn,
        ConnectorKind::BotClipOut,
        ConnectorKind::LeftClipOut,
        ConnectorKind::RightClipIn,
        ConnectorKind::TopPipeIn,
        ConnectorKind::BotPipeOut,
        ConnectorKind::LeftPipeIn,
        ConnectorKind::RightPipeOut,
    ];

    pub fn is_clip(self) -> bool {
        matches!(self.family(), ConnectorFamily::Clip(_))
    }

    pub fn is_pipe(self) -> bool {
        !self.is_clip()
    }

    /// Roles that accept more than one connector.
    pub fn is_multi(self) -> bool {
        matches!(self, ConnectorKind::TopPipeIn | ConnectorKind::LeftPipeIn)
    }

    /// Roles locked out when this connector is attached.
    pub fn disables(self) -> &'static [ConnectorKind] {
        use ConnectorKind::*;
        match self {
            TopClipIn => &[LeftClipOut, TopPipeIn],
            BotClipOut => &[LeftClipOut, BotPipeOut],
            LeftClipOut => &[TopClipIn, BotClipOut, LeftPipeIn],
            RightClipIn => &[RightPipeOut],
            TopPipeIn => &[TopClipIn, LeftClipOut],
            BotPipeOut => &[BotClipOut, LeftClipOut],
            LeftPipeIn => &[LeftClipOut, BotClipOut, TopClipIn],
            RightPipeOut => &[RightClipIn],
        }
    }

    pub fn family(self) -> ConnectorFamily {
        match self {
            ConnectorKind::TopClipIn => ConnectorFamily::Clip(ClipKind::TopIn),
            ConnectorKind::BotClipOut => ConnectorFamily::Clip(ClipKind::BotOut),
            ConnectorKind::LeftClipOut => ConnectorFamily::Clip(ClipKind::LeftOut),
            ConnectorKind::RightClipIn => ConnectorFamily::Clip(ClipKind::RightIn),
            ConnectorKind::TopPipeIn => ConnectorFamily::Pipe(PipeKind::TopIn),
            ConnectorKind::BotPipeOut => ConnectorFamily::Pipe(PipeKind::BotOut),
            ConnectorKind::LeftPipeIn => ConnectorFamily::Pipe(PipeKind::LeftIn),
            ConnectorKind::RightPipeOut => ConnectorFamily::Pipe(PipeKind::RightOut),
        }
    }

    /// The clip kind this connector carries, if it is a clip.
    pub fn clip_kind(self) -> Option<ClipKind> {
        match self.family() {
            ConnectorFamily::Clip(kind) => Some(kind),
            ConnectorFamily::Pipe(_) => None,
        }
    }

    /// The pipe-block kind this connector carries, if it is a pipe endpoint.
    pub fn pipe_kind(self) -> Option<PipeKind> {
        match self.family() {
            ConnectorFamily::Pipe(kind) => Some(kind),
            ConnectorFamily::Clip(_) => None,
        }
    }
}

/// Clip or pipe endpoint, with the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorFamily {
    Clip(ClipKind),
    Pipe(PipeKind),
}

/// Clip variants. Complementary pairs are TopIn↔BotOut and LeftOut↔RightIn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKind {
    TopIn,
    BotOut,
    LeftOut,
    RightIn,
}

impl ClipKind {
    pub fn complement(self) -> ClipKind {
        match self {
            ClipKind::TopIn => ClipKind::BotOut,
            ClipKind::BotOut => ClipKind::TopIn,
            ClipKind::LeftOut => ClipKind::RightIn,
            ClipKind::RightIn => ClipKind::LeftOut,
        }
    }

    /// Top/bottom clips snap vertically; left/right clips horizontally.
    pub fn is_vertical(self) -> bool {
        matches!(self, ClipKind::TopIn | ClipKind::BotOut)
    }

    pub fn connector(self) -> ConnectorKind {
        match self {
            ClipKind::TopIn => ConnectorKind::TopClipIn,
            ClipKind::BotOut => ConnectorKind::BotClipOut,
            ClipKind::LeftOut => ConnectorKind::LeftClipOut,
            ClipKind::RightIn => ConnectorKind::RightClipIn,
        }
    }
}

/// Pipe endpoint variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeKind {
    TopIn,
    BotOut,
    LeftIn,
    RightOut,
}

impl PipeKind {
    pub fn is_input(self) -> bool {
        matches!(self, PipeKind::TopIn | PipeKind::LeftIn)
    }

    pub fn is_output(self) -> bool {
        !self.is_input()
    }
}

/// Who owns a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipOwner {
    Block(BlockId),
    Slot(SlotId),
}

/// Content element of a block, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Slot(SlotId),
    Operator(OperatorId),
    Text(TextId),
}

/// Something that can be added to a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Connector(ConnectorKind),
    Slot,
    Operator,
    /// A label with the size measured by the renderer.
    Text { label: SharedString, size: Size },
}

/// What [`BlockGraph::add`](crate::BlockGraph::add) created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildId {
    Clip(ClipId),
    PipeBlock(PipeBlockId),
    Element(Element),
}

/// A draggable block.
#[derive(Clone)]
pub struct Block {
    pub name: String,
    pub content: Vec<Element>,

    pub position: Point,
    /// Intrinsic content size (the painted body rectangle).
    pub body: Size,
    /// Body plus connector reservations.
    pub outer: Size,
    pub content_offset: Point,

    pub fill: Color,
    pub stroke: Color,

    pub parent: Option<SlotId>,
    pub up: Option<BlockId>,
    pub down: Option<BlockId>,
    pub left: Option<BlockId>,
    pub right: Option<BlockId>,

    pub top_clip_in: ConnectorState<ClipId>,
    pub bot_clip_out: ConnectorState<ClipId>,
    pub left_clip_out: ConnectorState<ClipId>,
    pub right_clip_in: ConnectorState<ClipId>,
    pub top_pipes_in: ConnectorState<Vec<PipeBlockId>>,
    pub bot_pipe_out: ConnectorState<PipeBlockId>,
    pub left_pipes_in: ConnectorState<Vec<PipeBlockId>>,
    pub right_pipe_out: ConnectorState<PipeBlockId>,

    pub(crate) operation: Option<Operation>,
    pub(crate) removed: bool,
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("body", &self.body)
            .field("outer", &self.outer)
            .field("parent", &self.parent)
            .field("up", &self.up)
            .field("down", &self.down)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("has_operation", &self.operation.is_some())
            .finish_non_exhaustive()
    }
}

impl Block {
    pub(crate) fn new(name: String, body: Size, fill: Color, stroke: Color) -> Self {
        Self {
            name,
            content: Vec::new(),
            position: Point::ZERO,
            body,
            outer: body,
            content_offset: Point::ZERO,
            fill,
            stroke,
            parent: None,
            up: None,
            down: None,
            left: None,
            right: None,
            top_clip_in: ConnectorState::Empty,
            bot_clip_out: ConnectorState::Empty,
            left_clip_out: ConnectorState::Empty,
            right_clip_in: ConnectorState::Empty,
            top_pipes_in: ConnectorState::Empty,
            bot_pipe_out: ConnectorState::Empty,
            left_pipes_in: ConnectorState::Empty,
            right_pipe_out: ConnectorState::Empty,
            operation: None,
            removed: false,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn has_operation(&self) -> bool {
        self.operation.is_some()
    }

    pub fn role_status(&self, role: ConnectorKind) -> RoleStatus {
        fn status<T>(state: &ConnectorState<T>) -> RoleStatus {
            match state {
                ConnectorState::Empty => RoleStatus::Empty,
                ConnectorState::Attached(_) => RoleStatus::Attached,
                ConnectorState::Disabled => RoleStatus::Disabled,
            }
        }
        match role {
            ConnectorKind::TopClipIn => status(&self.top_clip_in),
            ConnectorKind::BotClipOut => status(&self.bot_clip_out),
            ConnectorKind::LeftClipOut => status(&self.left_clip_out),
            ConnectorKind::RightClipIn => status(&self.right_clip_in),
            ConnectorKind::TopPipeIn => status(&self.top_pipes_in),
            ConnectorKind::BotPipeOut => status(&self.bot_pipe_out),
            ConnectorKind::LeftPipeIn => status(&self.left_pipes_in),
            ConnectorKind::RightPipeOut => status(&self.right_pipe_out),
        }
    }

    pub(crate) fn disable_role(&mut self, role: ConnectorKind) {
        match role {
            ConnectorKind::TopClipIn => self.top_clip_in.disable(),
            ConnectorKind::BotClipOut => self.bot_clip_out.disable(),
            ConnectorKind::LeftClipOut => self.left_clip_out.disable(),
            ConnectorKind::RightClipIn => self.right_clip_in.disable(),
            ConnectorKind::TopPipeIn => self.top_pipes_in.disable(),
            ConnectorKind::BotPipeOut => self.bot_pipe_out.disable(),
            ConnectorKind::LeftPipeIn => self.left_pipes_in.disable(),
            ConnectorKind::RightPipeOut => self.right_pipe_out.disable(),
        }
    }

    /// The attached clip for a clip role.
    pub fn clip(&self, kind: ClipKind) -> Option<ClipId> {
        match kind {
            ClipKind::TopIn => self.top_clip_in.attached().copied(),
            ClipKind::BotOut => self.bot_clip_out.attached().copied(),
            ClipKind::LeftOut => self.left_clip_out.attached().copied(),
            ClipKind::RightIn => self.right_clip_in.attached().copied(),
        }
    }

    /// Every attached clip, in role order.
    pub fn clips(&self) -> impl Iterator<Item = ClipId> + '_ {
        [ClipKind::TopIn, ClipKind::BotOut, ClipKind::LeftOut, ClipKind::RightIn]
            .into_iter()
            .filter_map(|kind| self.clip(kind))
    }

    /// Every attached pipe endpoint: top inputs, left inputs, then outputs.
    pub fn pipe_blocks(&self) -> impl Iterator<Item = PipeBlockId> + '_ {
        self.top_pipes_in
            .items()
            .iter()
            .chain(self.left_pipes_in.items())
            .chain(self.bot_pipe_out.attached())
            .chain(self.right_pipe_out.attached())
            .copied()
    }

    pub fn has_top_pipes(&self) -> bool {
        !self.top_pipes_in.items().is_empty()
    }

    pub fn has_left_pipes(&self) -> bool {
        !self.left_pipes_in.items().is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.content.iter().filter_map(|element| match element {
            Element::Slot(slot) => Some(*slot),
            _ => None,
        })
    }
}

/// Container of a horizontal chain of inserted blocks.
#[derive(Debug, Clone)]
pub struct Slot {
    pub owner: BlockId,
    /// Position in the owner's content frame.
    pub position: Point,
    pub body: Size,
    /// Body plus the slot's own clip width.
    pub outer: Size,
    /// Right-receiving clip used for insertion matching.
    pub clip: ClipId,
    pub inserts: Vec<BlockId>,
    pub fill: Color,
    pub stroke: Color,
}

/// Fixed-size non-connecting node between slots.
#[derive(Debug, Clone)]
pub struct Operator {
    pub owner: BlockId,
    pub position: Point,
    pub size: Size,
    pub fill: Color,
}

#[derive(Debug, Clone)]
pub struct Text {
    pub owner: BlockId,
    pub position: Point,
    pub size: Size,
    pub label: SharedString,
}

/// Zero-size connector. `offset` is the top-left corner of its hit box in
/// the owner's frame (content frame for blocks, slot frame for slots).
#[derive(Debug, Clone)]
pub struct Clip {
    pub kind: ClipKind,
    pub owner: ClipOwner,
    pub offset: Point,
    pub size: Size,
    pub fill: Color,
    pub stroke: Color,
}

/// Round pipe endpoint placed in its block's content frame.
#[derive(Debug, Clone)]
pub struct PipeBlock {
    pub kind: PipeKind,
    pub owner: BlockId,
    pub offset: Point,
    pub size: Size,
    /// Pipes ending (inputs) or starting (outputs) here.
    pub pipes: Vec<PipeId>,
    pub fill: Color,
    pub stroke: Color,
}

/// A straight line from an output endpoint to an input endpoint.
///
/// `input` is `None` while the pipe is being dragged; `end` then follows the
/// pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub output: PipeBlockId,
    pub input: Option<PipeBlockId>,
    pub start: Point,
    pub end: Point,
}

impl Pipe {
    pub fn is_committed(&self) -> bool {
        self.input.is_some()
    }
}
