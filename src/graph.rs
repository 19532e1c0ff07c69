use crate::config::EditorConfig;
use crate::error::{Diagnostics, EditorError};
use crate::geometry::{Point, Size};
use crate::model::{
    Block, BlockId, Child, ChildId, Clip, ClipId, ClipKind, ClipOwner, ConnectorFamily,
    ConnectorKind, ConnectorState, Element, Operation, Operator, OperatorId, Pipe, PipeBlock,
    PipeBlockId, PipeId, PipeKind, RoleStatus, Slot, SlotId, Text, TextId,
};
use crate::registry::ConnectorRegistry;
use indexmap::{IndexMap, IndexSet};
use slint::{Color, SharedString};
use std::collections::HashSet;
use std::rc::Rc;

/// Arena holding every entity of one editing session.
///
/// All mutation goes through methods on this type (spread over the
/// `graph`, `layout`, `resolve`, `execution` and `links` modules). Layout
/// propagation completes before each method returns.
///
/// # Example
///
/// ```
/// use slint_block_editor::{BlockGraph, Child, ConnectorKind};
///
/// let mut graph = BlockGraph::new();
/// let block = graph.create_block("block1").unwrap();
/// graph.add(block, Child::Connector(ConnectorKind::BotClipOut)).unwrap();
/// graph.add(block, Child::Slot).unwrap();
///
/// assert_eq!(graph.block(block).body.width, 104.0);
/// ```
pub struct BlockGraph {
    pub(crate) config: EditorConfig,
    pub(crate) blocks: Vec<Block>,
    pub(crate) names: IndexMap<String, BlockId>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) operators: Vec<Operator>,
    pub(crate) texts: Vec<Text>,
    pub(crate) clips: Vec<Clip>,
    pub(crate) pipe_blocks: Vec<PipeBlock>,
    pub(crate) pipes: IndexMap<PipeId, Pipe>,
    pub(crate) next_pipe: usize,
    pub(crate) registry: ConnectorRegistry,
    /// Top-level blocks, back to front.
    pub(crate) paint_order: IndexSet<BlockId>,
    pub(crate) diagnostics: Diagnostics,
}

impl Default for BlockGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGraph {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            names: IndexMap::new(),
            slots: Vec::new(),
            operators: Vec::new(),
            texts: Vec::new(),
            clips: Vec::new(),
            pipe_blocks: Vec::new(),
            pipes: IndexMap::new(),
            next_pipe: 0,
            registry: ConnectorRegistry::new(),
            paint_order: IndexSet::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Report through the diagnostic channel and hand the error back.
    pub(crate) fn reject<T>(&mut self, error: EditorError) -> Result<T, EditorError> {
        self.diagnostics.report(error.clone());
        Err(error)
    }

    // === Lookups ===

    /// Panics if `id` was not created by this graph.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }

    /// Live (not removed) block by handle.
    pub fn get_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0).filter(|b| !b.removed)
    }

    /// Find a live block by its session name.
    pub fn find(&self, name: &str) -> Option<BlockId> {
        self.names.get(name).copied()
    }

    /// Live blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.removed)
            .map(|(i, b)| (BlockId(i), b))
    }

    pub fn block_count(&self) -> usize {
        self.names.len()
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id.0]
    }

    pub fn text(&self, id: TextId) -> &Text {
        &self.texts[id.0]
    }

    pub fn clip(&self, id: ClipId) -> &Clip {
        &self.clips[id.0]
    }

    pub fn pipe_block(&self, id: PipeBlockId) -> &PipeBlock {
        &self.pipe_blocks[id.0]
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(&id)
    }

    /// Pipes in creation order, including an in-flight one.
    pub fn pipes(&self) -> impl Iterator<Item = (PipeId, &Pipe)> + '_ {
        self.pipes.iter().map(|(id, pipe)| (*id, pipe))
    }

    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Top-level blocks, back to front.
    pub fn paint_order(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.paint_order.iter().copied()
    }

    /// The block owning a clip (a slot's clip belongs to the slot's owner).
    pub fn clip_owner_block(&self, clip: ClipId) -> BlockId {
        match self.clips[clip.0].owner {
            ClipOwner::Block(block) => block,
            ClipOwner::Slot(slot) => self.slots[slot.0].owner,
        }
    }

    /// Size of a content element as used by [`fit_children`](Self::fit_children).
    pub fn element_size(&self, element: Element) -> Size {
        match element {
            Element::Slot(slot) => self.slots[slot.0].outer,
            Element::Operator(op) => self.operators[op.0].size,
            Element::Text(text) => self.texts[text.0].size,
        }
    }

    pub(crate) fn element_position_mut(&mut self, element: Element) -> &mut Point {
        match element {
            Element::Slot(slot) => &mut self.slots[slot.0].position,
            Element::Operator(op) => &mut self.operators[op.0].position,
            Element::Text(text) => &mut self.texts[text.0].position,
        }
    }

    // === Construction ===

    /// Create a top-level block with default size and colors.
    pub fn create_block(&mut self, name: &str) -> Result<BlockId, EditorError> {
        if self.names.contains_key(name) {
            return self.reject(EditorError::DuplicateName(name.to_string()));
        }

        let id = BlockId(self.blocks.len());
        let body = Size::new(self.config.block_width, self.config.block_height);
        self.blocks.push(Block::new(
            name.to_string(),
            body,
            self.config.block_color,
            self.config.border_color,
        ));
        self.names.insert(name.to_string(), id);
        self.paint_order.insert(id);
        log::debug!("created {id} ({name})");
        Ok(id)
    }

    /// Add a connector or content element to a block, then re-fit it.
    ///
    /// Connectors go through the attach rules and may be refused with
    /// [`EditorError::ConnectorConflict`], leaving the graph unchanged.
    pub fn add(&mut self, block: BlockId, child: Child) -> Result<ChildId, EditorError> {
        let element = match child {
            Child::Connector(kind) => return self.attach(block, kind),
            Child::Slot => Element::Slot(self.push_slot(block)),
            Child::Operator => Element::Operator(self.push_operator(block)),
            Child::Text { label, size } => Element::Text(self.push_text(block, label, size)),
        };
        self.append_element(block, element);
        Ok(ChildId::Element(element))
    }

    pub fn add_connector(
        &mut self,
        block: BlockId,
        kind: ConnectorKind,
    ) -> Result<ChildId, EditorError> {
        self.add(block, Child::Connector(kind))
    }

    pub fn add_slot(&mut self, block: BlockId) -> SlotId {
        let slot = self.push_slot(block);
        self.append_element(block, Element::Slot(slot));
        slot
    }

    pub fn add_operator(&mut self, block: BlockId) -> OperatorId {
        let op = self.push_operator(block);
        self.append_element(block, Element::Operator(op));
        op
    }

    pub fn add_text(&mut self, block: BlockId, label: &str, size: Size) -> TextId {
        let text = self.push_text(block, SharedString::from(label), size);
        self.append_element(block, Element::Text(text));
        text
    }

    fn append_element(&mut self, block: BlockId, element: Element) {
        self.blocks[block.0].content.push(element);
        self.fit_children(block);
    }

    fn push_operator(&mut self, owner: BlockId) -> OperatorId {
        let id = OperatorId(self.operators.len());
        self.operators.push(Operator {
            owner,
            position: Point::new(0.0, self.config.header_offset + self.config.operator_y),
            size: Size::new(self.config.operator_width, self.config.operator_height),
            fill: self.config.operator_color,
        });
        id
    }

    fn push_text(&mut self, owner: BlockId, label: SharedString, size: Size) -> TextId {
        let id = TextId(self.texts.len());
        self.texts.push(Text {
            owner,
            position: Point::new(0.0, self.config.header_offset),
            size,
            label,
        });
        id
    }

    fn push_slot(&mut self, owner: BlockId) -> SlotId {
        let slot = SlotId(self.slots.len());
        let clip = ClipId(self.clips.len());
        let extent = self.config.lr_clip_extent();
        let body = Size::new(self.config.slot_width, self.config.slot_height);

        self.clips.push(Clip {
            kind: ClipKind::RightIn,
            owner: ClipOwner::Slot(slot),
            offset: Point::new(0.0, self.slot_clip_y(body.height)),
            size: Size::new(extent, extent),
            fill: self.config.slot_color,
            stroke: self.config.border_color,
        });
        self.slots.push(Slot {
            owner,
            position: Point::new(0.0, self.config.header_offset),
            body,
            outer: Size::new(body.width + self.config.lr_clip_width, body.height),
            clip,
            inserts: Vec::new(),
            fill: self.config.slot_color,
            stroke: self.config.border_color,
        });
        self.registry.register_clip(ClipKind::RightIn, clip);
        slot
    }

    // === Attach rules ===

    fn check_attach(&self, block: BlockId, kind: ConnectorKind) -> Result<(), &'static str> {
        let b = &self.blocks[block.0];
        match b.role_status(kind) {
            RoleStatus::Disabled => return Err("role is disabled"),
            RoleStatus::Attached if !kind.is_multi() => return Err("role is already attached"),
            _ => {}
        }
        if kind
            .disables()
            .iter()
            .any(|other| b.role_status(*other) == RoleStatus::Attached)
        {
            return Err("a conflicting connector is attached");
        }
        Ok(())
    }

    fn attach(&mut self, block: BlockId, kind: ConnectorKind) -> Result<ChildId, EditorError> {
        if let Err(reason) = self.check_attach(block, kind) {
            return self.reject(EditorError::ConnectorConflict { block, connector: kind, reason });
        }

        let (child, width, height) = match kind.family() {
            ConnectorFamily::Clip(clip_kind) => {
                (ChildId::Clip(self.attach_clip(block, clip_kind)), None, None)
            }
            ConnectorFamily::Pipe(pipe_kind) => {
                let (id, width, height) = self.attach_pipe_block(block, pipe_kind);
                (ChildId::PipeBlock(id), width, height)
            }
        };

        let b = &mut self.blocks[block.0];
        for other in kind.disables() {
            b.disable_role(*other);
        }
        self.update_content_offset(block);
        self.set_size(block, width, height);
        self.fit_children(block);
        Ok(child)
    }

    fn attach_clip(&mut self, block: BlockId, kind: ClipKind) -> ClipId {
        let cfg = &self.config;
        let b = &self.blocks[block.0];
        let transparent = Color::from_argb_u8(0, 255, 255, 255);
        let tb = cfg.tb_clip_extent();
        let lr = cfg.lr_clip_extent();
        let lr_y = self.lr_clip_y(b.body.height);

        let (offset, size, fill) = match kind {
            ClipKind::TopIn => (Point::new(cfg.tb_clip_x, -tb / 2.0), tb, transparent),
            ClipKind::BotOut => {
                (Point::new(cfg.tb_clip_x, b.body.height - tb / 2.0), tb, b.fill)
            }
            ClipKind::LeftOut => (Point::new(-cfg.lr_clip_width, lr_y), lr, b.fill),
            ClipKind::RightIn => {
                (Point::new(b.body.width - cfg.lr_clip_width, lr_y), lr, transparent)
            }
        };

        let id = ClipId(self.clips.len());
        self.clips.push(Clip {
            kind,
            owner: ClipOwner::Block(block),
            offset,
            size: Size::new(size, size),
            fill,
            stroke: cfg.border_color,
        });

        let b = &mut self.blocks[block.0];
        match kind {
            ClipKind::TopIn => b.top_clip_in = ConnectorState::Attached(id),
            ClipKind::BotOut => b.bot_clip_out = ConnectorState::Attached(id),
            ClipKind::LeftOut => b.left_clip_out = ConnectorState::Attached(id),
            ClipKind::RightIn => b.right_clip_in = ConnectorState::Attached(id),
        }
        self.registry.register_clip(kind, id);
        id
    }

    /// Place a pipe endpoint and return the body size it requires.
    fn attach_pipe_block(
        &mut self,
        block: BlockId,
        kind: PipeKind,
    ) -> (PipeBlockId, Option<f32>, Option<f32>) {
        let cfg = &self.config;
        let extent = cfg.pipe_extent();
        let radius = cfg.pipe_radius;
        let margin = cfg.margin;
        let b = &self.blocks[block.0];

        let (offset, width, height) = match kind {
            PipeKind::TopIn => {
                let x = margin + b.top_pipes_in.items().len() as f32 * (extent + margin);
                (Point::new(x, -radius), Some(x + extent + margin), None)
            }
            PipeKind::LeftIn => {
                let y = margin + b.left_pipes_in.items().len() as f32 * (extent + margin);
                (Point::new(-radius, y), None, Some(y + extent + margin))
            }
            PipeKind::BotOut => (
                Point::new(margin, cfg.block_height / 2.0 - radius),
                Some(2.0 * margin + extent),
                None,
            ),
            PipeKind::RightOut => (
                Point::new(cfg.block_width / 2.0 - radius, margin),
                None,
                Some(2.0 * margin + extent),
            ),
        };

        let id = PipeBlockId(self.pipe_blocks.len());
        self.pipe_blocks.push(PipeBlock {
            kind,
            owner: block,
            offset,
            size: Size::new(extent, extent),
            pipes: Vec::new(),
            fill: cfg.block_color,
            stroke: cfg.border_color,
        });

        let b = &mut self.blocks[block.0];
        match kind {
            PipeKind::TopIn => push_multi(&mut b.top_pipes_in, id),
            PipeKind::LeftIn => push_multi(&mut b.left_pipes_in, id),
            PipeKind::BotOut => b.bot_pipe_out = ConnectorState::Attached(id),
            PipeKind::RightOut => b.right_pipe_out = ConnectorState::Attached(id),
        }
        self.registry.register_pipe_block(kind, id);
        (id, width, height)
    }

    // === Operations and paint state ===

    pub fn set_operation<F>(&mut self, block: BlockId, op: F)
    where
        F: Fn(BlockId) -> anyhow::Result<()> + 'static,
    {
        self.blocks[block.0].operation = Some(Rc::new(op));
    }

    pub fn clear_operation(&mut self, block: BlockId) {
        self.blocks[block.0].operation = None;
    }

    pub(crate) fn operation(&self, block: BlockId) -> Option<Operation> {
        self.blocks[block.0].operation.clone()
    }

    /// Fill a block (and its left/bottom clips) with a `#RGB` or `#RRGGBB` color.
    pub fn color(&mut self, block: BlockId, hex: &str) -> Result<(), EditorError> {
        let Some(color) = parse_hex_color(hex) else {
            return self.reject(EditorError::InvalidColor(hex.to_string()));
        };

        let b = &mut self.blocks[block.0];
        b.fill = color;
        let tinted: Vec<ClipId> = [b.left_clip_out.attached(), b.bot_clip_out.attached()]
            .into_iter()
            .flatten()
            .copied()
            .collect();
        for clip in tinted {
            self.clips[clip.0].fill = color;
        }
        Ok(())
    }

    /// Stroke the chain containing `block` for hover feedback.
    ///
    /// The block owning the hovered block's slot gets the opposite stroke so
    /// only the innermost hovered chain stands out.
    pub fn highlight_connected(&mut self, block: BlockId, hovered: bool) {
        let (color, inverse) = if hovered {
            (self.config.highlight_color, self.config.border_color)
        } else {
            (self.config.border_color, self.config.highlight_color)
        };

        if let Some(slot) = self.blocks[block.0].parent {
            let owner = self.slots[slot.0].owner;
            for member in self.connected(owner) {
                self.stroke(member, inverse);
            }
        }
        for member in self.connected(block) {
            self.stroke(member, color);
        }
    }

    fn stroke(&mut self, block: BlockId, color: Color) {
        let b = &mut self.blocks[block.0];
        b.stroke = color;
        let clips: Vec<ClipId> = b.clips().collect();
        let pipe_blocks: Vec<PipeBlockId> = b.pipe_blocks().collect();
        for clip in clips {
            self.clips[clip.0].stroke = color;
        }
        for pb in pipe_blocks {
            self.pipe_blocks[pb.0].stroke = color;
        }
    }

    /// `block` and everything reachable through `right`/`down`, preorder
    /// (self, right subtree, down subtree), each member once.
    pub fn connected(&self, block: BlockId) -> Vec<BlockId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![block];

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            let b = &self.blocks[current.0];
            if let Some(down) = b.down {
                stack.push(down);
            }
            if let Some(right) = b.right {
                stack.push(right);
            }
        }
        order
    }

    /// Whether `target` is `origin`, in its down/right closure, or nested
    /// inside a slot of any of those blocks.
    pub fn reaches(&self, origin: BlockId, target: BlockId) -> bool {
        let mut stack = self.connected(origin);
        let mut seen: HashSet<BlockId> = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for slot in self.blocks[current.0].slots() {
                for insert in &self.slots[slot.0].inserts {
                    stack.extend(self.connected(*insert));
                }
            }
        }
        false
    }

    /// Whether `block` is `container` or sits, at any depth, inside one of
    /// its slots.
    pub fn is_nested_in(&self, block: BlockId, container: BlockId) -> bool {
        let mut current = block;
        loop {
            if current == container {
                return true;
            }
            match self.blocks[current.0].parent {
                Some(slot) => current = self.slots[slot.0].owner,
                None => return false,
            }
        }
    }

    /// Move the block's chain to the end of the paint order.
    pub fn bring_to_front(&mut self, block: BlockId) {
        for member in self.connected(block) {
            if self.blocks[member.0].parent.is_none() && !self.blocks[member.0].removed {
                self.paint_order.shift_remove(&member);
                self.paint_order.insert(member);
            }
        }
    }

    // === Removal ===

    /// Remove a block from the session.
    ///
    /// Links are cleared on both sides, blocks inserted in its slots are
    /// released at their absolute positions, pipes touching it are removed
    /// and its connectors leave the registries.
    pub fn remove_block(&mut self, block: BlockId) {
        if self.get_block(block).is_none() {
            return;
        }

        if let Some(slot) = self.blocks[block.0].parent {
            self.pop_out(slot, block);
        }
        self.detach(block);

        let b = &mut self.blocks[block.0];
        let (right, down) = (b.right.take(), b.down.take());
        if let Some(right) = right {
            self.blocks[right.0].left = None;
        }
        if let Some(down) = down {
            self.blocks[down.0].up = None;
        }

        let slots: Vec<SlotId> = self.blocks[block.0].slots().collect();
        for slot in &slots {
            if let Some(&first) = self.slots[slot.0].inserts.first() {
                self.pop_out(*slot, first);
            }
            let clip = self.slots[slot.0].clip;
            self.registry.unregister_clip(ClipKind::RightIn, clip);
        }

        let pipe_blocks: Vec<PipeBlockId> = self.blocks[block.0].pipe_blocks().collect();
        for pb in pipe_blocks {
            let pipes = self.pipe_blocks[pb.0].pipes.clone();
            for pipe in pipes {
                self.remove_pipe(pipe);
            }
            self.registry.unregister_pipe_block(self.pipe_blocks[pb.0].kind, pb);
        }

        let clips: Vec<ClipId> = self.blocks[block.0].clips().collect();
        for clip in clips {
            self.registry.unregister_clip(self.clips[clip.0].kind, clip);
        }

        let b = &mut self.blocks[block.0];
        b.removed = true;
        let name = b.name.clone();
        self.names.shift_remove(&name);
        self.paint_order.shift_remove(&block);
        log::debug!("removed {block} ({name})");
    }

    /// Remove a pipe and unlink it from both endpoints.
    pub fn remove_pipe(&mut self, pipe: PipeId) -> bool {
        let Some(removed) = self.pipes.shift_remove(&pipe) else {
            return false;
        };
        self.pipe_blocks[removed.output.0].pipes.retain(|p| *p != pipe);
        if let Some(input) = removed.input {
            self.pipe_blocks[input.0].pipes.retain(|p| *p != pipe);
        }
        true
    }
}

fn push_multi(state: &mut ConnectorState<Vec<PipeBlockId>>, id: PipeBlockId) {
    match state {
        ConnectorState::Attached(items) => items.push(id),
        _ => *state = ConnectorState::Attached(vec![id]),
    }
}

/// Parse `#RGB` or `#RRGGBB` (case-insensitive).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channels: Vec<u8> = match digits.len() {
        3 => digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8 * 17))
            .collect::<Option<_>>()?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };
    Some(Color::from_rgb_u8(channels[0], channels[1], channels[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_block() -> (BlockGraph, BlockId) {
        let mut graph = BlockGraph::new();
        let block = graph.create_block("block1").unwrap();
        (graph, block)
    }

    #[test]
    fn test_create_block_defaults() {
        let (graph, block) = graph_with_block();
        let b = graph.block(block);

        assert_eq!(b.body, Size::new(100.0, 100.0));
        assert_eq!(b.outer, b.body);
        assert!(b.content.is_empty());
        for role in ConnectorKind::ALL {
            assert_eq!(b.role_status(role), RoleStatus::Empty);
        }
        assert_eq!(graph.find("block1"), Some(block));
    }

    #[test]
    fn test_create_block_rejects_duplicate_name() {
        let (mut graph, _) = graph_with_block();

        let result = graph.create_block("block1");

        assert_eq!(result, Err(EditorError::DuplicateName("block1".into())));
        assert_eq!(graph.diagnostics().len(), 1);
        assert_eq!(graph.block_count(), 1);
    }

    #[test]
    fn test_attach_disables_conflicting_roles() {
        let (mut graph, block) = graph_with_block();

        graph.add_connector(block, ConnectorKind::TopClipIn).unwrap();

        let b = graph.block(block);
        assert_eq!(b.role_status(ConnectorKind::TopClipIn), RoleStatus::Attached);
        assert_eq!(b.role_status(ConnectorKind::LeftClipOut), RoleStatus::Disabled);
        assert_eq!(b.role_status(ConnectorKind::TopPipeIn), RoleStatus::Disabled);
        assert_eq!(b.role_status(ConnectorKind::BotClipOut), RoleStatus::Empty);
    }

    #[test]
    fn test_refused_attach_leaves_state_untouched() {
        let (mut graph, block) = graph_with_block();
        graph.add_connector(block, ConnectorKind::LeftClipOut).unwrap();
        let before = format!("{:?}", graph.block(block));
        let clips_before = graph.clips.len();

        let result = graph.add_connector(block, ConnectorKind::TopClipIn);

        assert!(matches!(
            result,
            Err(EditorError::ConnectorConflict { connector: ConnectorKind::TopClipIn, .. })
        ));
        assert_eq!(format!("{:?}", graph.block(block)), before);
        assert_eq!(graph.clips.len(), clips_before);
        assert_eq!(graph.block(block).role_status(ConnectorKind::TopClipIn), RoleStatus::Disabled);
    }

    #[test]
    fn test_single_valued_role_refuses_second_attach() {
        let (mut graph, block) = graph_with_block();
        graph.add_connector(block, ConnectorKind::RightClipIn).unwrap();

        assert!(graph.add_connector(block, ConnectorKind::RightClipIn).is_err());
        assert_eq!(graph.registry().clips(ClipKind::RightIn).count(), 1);
    }

    #[test]
    fn test_multi_valued_role_accepts_many() {
        let (mut graph, block) = graph_with_block();

        graph.add_connector(block, ConnectorKind::TopPipeIn).unwrap();
        graph.add_connector(block, ConnectorKind::TopPipeIn).unwrap();

        assert_eq!(graph.block(block).top_pipes_in.items().len(), 2);
        assert_eq!(graph.registry().pipe_inputs().count(), 2);
    }

    #[test]
    fn test_attach_refused_when_disabled_role_would_be_attached() {
        // Attaching a bottom pipe when a bottom clip exists must fail even
        // though the bottom pipe role itself is merely disabled.
        let (mut graph, block) = graph_with_block();
        graph.add_connector(block, ConnectorKind::BotClipOut).unwrap();

        let result = graph.add_connector(block, ConnectorKind::BotPipeOut);
        assert!(result.is_err());
        assert!(graph.block(block).bot_pipe_out.is_disabled());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#fff"), Some(Color::from_rgb_u8(255, 255, 255)));
        assert_eq!(parse_hex_color("#29ABe2"), Some(Color::from_rgb_u8(0x29, 0xab, 0xe2)));
        assert_eq!(parse_hex_color("29abe2"), None);
        assert_eq!(parse_hex_color("#29abe"), None);
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color("#"), None);
    }

    #[test]
    fn test_color_tints_left_and_bottom_clips() {
        let (mut graph, block) = graph_with_block();
        graph.add_connector(block, ConnectorKind::BotClipOut).unwrap();
        let clip = graph.block(block).bot_clip_out.attached().copied().unwrap();

        graph.color(block, "#f00").unwrap();

        let red = Color::from_rgb_u8(255, 0, 0);
        assert_eq!(graph.block(block).fill, red);
        assert_eq!(graph.clip(clip).fill, red);
    }

    #[test]
    fn test_invalid_color_is_reported_and_ignored() {
        let (mut graph, block) = graph_with_block();
        let before = graph.block(block).fill;

        assert!(graph.color(block, "red").is_err());

        assert_eq!(graph.block(block).fill, before);
        assert_eq!(graph.diagnostics().last(), Some(&EditorError::InvalidColor("red".into())));
    }

    #[test]
    fn test_connected_is_preorder_right_before_down() {
        let mut graph = BlockGraph::new();
        let a = graph.create_block("a").unwrap();
        let b = graph.create_block("b").unwrap();
        let c = graph.create_block("c").unwrap();
        let d = graph.create_block("d").unwrap();
        graph.block_mut(a).down = Some(c);
        graph.block_mut(c).up = Some(a);
        graph.block_mut(a).right = Some(b);
        graph.block_mut(b).left = Some(a);
        graph.block_mut(c).right = Some(d);
        graph.block_mut(d).left = Some(c);

        assert_eq!(graph.connected(a), vec![a, b, c, d]);
    }

    #[test]
    fn test_bring_to_front_moves_chain_to_end() {
        let mut graph = BlockGraph::new();
        let a = graph.create_block("a").unwrap();
        let b = graph.create_block("b").unwrap();
        let c = graph.create_block("c").unwrap();
        graph.block_mut(a).right = Some(b);
        graph.block_mut(b).left = Some(a);

        graph.bring_to_front(a);

        assert_eq!(graph.paint_order().collect::<Vec<_>>(), vec![c, a, b]);
    }

    #[test]
    fn test_highlight_connected_strokes_chain() {
        let mut graph = BlockGraph::new();
        let a = graph.create_block("a").unwrap();
        let b = graph.create_block("b").unwrap();
        graph.block_mut(a).right = Some(b);
        graph.block_mut(b).left = Some(a);
        let highlight = graph.config().highlight_color;

        graph.highlight_connected(a, true);
        assert_eq!(graph.block(b).stroke, highlight);

        graph.highlight_connected(a, false);
        assert_eq!(graph.block(b).stroke, graph.config().border_color);
    }
}
