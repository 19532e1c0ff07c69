//! Layout engine for nested, chained blocks.
//!
//! Sizes flow bottom-up (inserted blocks size their slot, slots size their
//! owner) and positions flow along chain links (`down` neighbors hang below
//! their `up`, `right` neighbors sit against their `left`). Every entry point
//! finishes propagation before returning.
//!
//! Nothing here recurses without bound: containment is acyclic and chain
//! walks carry a visited set.

use crate::geometry::{Point, Rect, Size};
use crate::graph::BlockGraph;
use crate::model::{BlockId, Element, PipeBlockId, PipeKind, SlotId};
use std::collections::HashSet;

impl BlockGraph {
    /// Vertical offset of a left/right clip box for a body of `body_height`.
    pub(crate) fn lr_clip_y(&self, body_height: f32) -> f32 {
        let cfg = &self.config;
        body_height.min(cfg.block_height) / 2.0 - cfg.lr_clip_radius - cfg.border_size / 2.0
    }

    /// Vertical offset of a slot's clip box for a slot body of `body_height`.
    pub(crate) fn slot_clip_y(&self, body_height: f32) -> f32 {
        body_height.min(self.config.block_height) / 2.0 - self.config.lr_clip_radius
    }

    /// Size a block to its content elements, then re-fit the slot it sits in.
    ///
    /// Elements are laid out left to right starting at the margin with a
    /// margin between them. A block without content keeps its body size.
    pub fn fit_children(&mut self, block: BlockId) {
        let margin = self.config.margin;
        let header = self.config.header_offset;
        let content = self.blocks[block.0].content.clone();

        if content.is_empty() {
            self.set_size(block, None, None);
        } else {
            let mut x = margin;
            let mut height: f32 = 0.0;
            for element in content {
                self.element_position_mut(element).x = x;
                let size = self.element_size(element);
                x += size.width + margin;
                height = height.max(size.height);
            }
            self.set_size(block, Some(x), Some(height + header + margin));
        }

        if let Some(slot) = self.blocks[block.0].parent {
            self.fit_inserts(slot);
        }
    }

    /// Set the body size (`None` keeps the current value) and recompute the
    /// outer size, clip positions and connected blocks.
    pub fn set_size(&mut self, block: BlockId, width: Option<f32>, height: Option<f32>) {
        let cfg = &self.config;
        let b = &mut self.blocks[block.0];
        if let Some(width) = width {
            b.body.width = width;
        }
        if let Some(height) = height {
            b.body.height = height;
        }

        let mut outer = b.body;
        if b.left_clip_out.is_attached() {
            outer.width += cfg.lr_clip_width;
        }
        if b.bot_clip_out.is_attached() {
            outer.height += cfg.tb_clip_adjust;
        }
        if b.has_top_pipes() {
            outer.height += cfg.pipe_radius;
        }
        if b.bot_pipe_out.is_attached() {
            outer.height += cfg.pipe_radius;
        }
        if b.has_left_pipes() {
            outer.width += cfg.pipe_radius;
        }
        if b.right_pipe_out.is_attached() {
            outer.width += cfg.pipe_radius;
        }
        b.outer = outer;

        let body = b.body;
        let bot = b.bot_clip_out.attached().copied();
        let right = b.right_clip_in.attached().copied();
        let left = b.left_clip_out.attached().copied();
        let tb_y = body.height - cfg.tb_clip_extent() / 2.0;
        let tb_x = cfg.tb_clip_x;
        let lr_width = cfg.lr_clip_width;
        let lr_y = self.lr_clip_y(body.height);

        if let Some(clip) = bot {
            self.clips[clip.0].offset = Point::new(tb_x, tb_y);
        }
        if let Some(clip) = right {
            self.clips[clip.0].offset = Point::new(body.width - lr_width, lr_y);
        }
        if let Some(clip) = left {
            self.clips[clip.0].offset = Point::new(-lr_width, lr_y);
        }

        self.set_connected(block);
    }

    /// Recompute the space reserved left of and above the content frame.
    pub(crate) fn update_content_offset(&mut self, block: BlockId) {
        let cfg = &self.config;
        let b = &mut self.blocks[block.0];
        let x = if b.left_clip_out.is_attached() {
            cfg.lr_clip_width
        } else if b.has_left_pipes() {
            cfg.pipe_radius
        } else {
            0.0
        };
        let y = if b.has_top_pipes() { cfg.pipe_radius } else { 0.0 };
        b.content_offset = Point::new(x, y);
    }

    /// Lay out a slot's inserts side by side and size the slot to them.
    ///
    /// Neighboring inserts overlap by the left clip width. The owner is then
    /// re-fitted and its horizontal chain equalized.
    pub fn fit_inserts(&mut self, slot: SlotId) {
        let lr_width = self.config.lr_clip_width;
        let inserts = self.slots[slot.0].inserts.clone();

        let size = if inserts.is_empty() {
            Size::new(self.config.slot_width, self.config.slot_height)
        } else {
            let mut x = 0.0;
            let mut height: f32 = 0.0;
            for insert in inserts {
                let b = &mut self.blocks[insert.0];
                b.position = Point::new(x, 0.0);
                x += b.outer.width - lr_width;
                height = height.max(b.outer.height);
            }
            Size::new(x, height)
        };

        self.set_slot_size(slot, size);
        let owner = self.slots[slot.0].owner;
        self.make_all_equal_height(owner);
    }

    fn set_slot_size(&mut self, slot: SlotId, body: Size) {
        let clip_y = self.slot_clip_y(body.height);
        let s = &mut self.slots[slot.0];
        s.body = body;
        s.outer = Size::new(body.width + self.config.lr_clip_width, body.height);
        let clip = s.clip;
        self.clips[clip.0].offset.y = clip_y;
    }

    /// The horizontal chain containing `block`, leftmost first.
    pub fn horizontal_chain(&self, block: BlockId) -> Vec<BlockId> {
        let mut seen = HashSet::from([block]);
        let mut leftmost = block;
        while let Some(left) = self.blocks[leftmost.0].left {
            if !seen.insert(left) {
                break;
            }
            leftmost = left;
        }

        let mut chain = vec![leftmost];
        let mut seen = HashSet::from([leftmost]);
        let mut current = leftmost;
        while let Some(right) = self.blocks[current.0].right {
            if !seen.insert(right) {
                break;
            }
            chain.push(right);
            current = right;
        }
        chain
    }

    /// Re-fit every member of the block's horizontal chain and give them all
    /// the tallest member's body height.
    pub fn make_all_equal_height(&mut self, block: BlockId) {
        let chain = self.horizontal_chain(block);
        for member in &chain {
            self.fit_children(*member);
        }

        let height = chain
            .iter()
            .map(|member| self.blocks[member.0].body.height)
            .fold(0.0, f32::max);
        for member in &chain {
            self.set_size(*member, None, Some(height));
        }

        if let Some(&leftmost) = chain.first() {
            self.set_connected(leftmost);
        }
    }

    /// Re-position everything hanging off `block` through `down` and `right`
    /// links and refresh the pipe lines of every visited block.
    pub fn set_connected(&mut self, block: BlockId) {
        self.refresh_pipes(block);

        let mut seen = HashSet::from([block]);
        let mut stack = vec![block];
        while let Some(current) = stack.pop() {
            let b = &self.blocks[current.0];
            let (down, right) = (b.down, b.right);

            if let Some(down) = down.filter(|d| seen.insert(*d)) {
                self.blocks[down.0].position = self.below(current, down);
                self.refresh_pipes(down);
                stack.push(down);
            }
            if let Some(right) = right.filter(|r| seen.insert(*r)) {
                self.blocks[right.0].position = self.right_of(current);
                self.refresh_pipes(right);
                stack.push(right);
            }
        }
    }

    /// Move a block within its parent frame and drag its chain along.
    pub fn set_position(&mut self, block: BlockId, position: Point) {
        self.blocks[block.0].position = position;
        self.set_connected(block);
    }

    /// Horizontal shift aligning the bodies of a vertical pair when exactly
    /// one of them reserves space for a left clip.
    pub(crate) fn vertical_compensation(&self, top: BlockId, bot: BlockId) -> f32 {
        let top_left = self.blocks[top.0].left_clip_out.is_attached();
        let bot_left = self.blocks[bot.0].left_clip_out.is_attached();
        match (top_left, bot_left) {
            (true, false) => self.config.lr_clip_width,
            (false, true) => -self.config.lr_clip_width,
            _ => 0.0,
        }
    }

    /// Where `bot` goes when hanging below `top`.
    pub(crate) fn below(&self, top: BlockId, bot: BlockId) -> Point {
        let t = &self.blocks[top.0];
        let clearance = if t.has_top_pipes() { self.config.pipe_radius } else { 0.0 };
        Point::new(
            t.position.x + self.vertical_compensation(top, bot),
            t.position.y + t.body.height + clearance,
        )
    }

    /// Where a block goes when sitting right of `left`.
    pub(crate) fn right_of(&self, left: BlockId) -> Point {
        let l = &self.blocks[left.0];
        Point::new(l.position.x + l.outer.width - self.config.lr_clip_width, l.position.y)
    }

    // === Frames ===

    /// World position of a block's frame origin.
    pub fn absolute_origin(&self, block: BlockId) -> Point {
        let b = &self.blocks[block.0];
        match b.parent {
            Some(slot) => self.slot_origin(slot) + b.position,
            None => b.position,
        }
    }

    /// World position of a block's content frame origin.
    pub fn content_origin(&self, block: BlockId) -> Point {
        self.absolute_origin(block) + self.blocks[block.0].content_offset
    }

    /// World position of a slot's frame origin.
    pub fn slot_origin(&self, slot: SlotId) -> Point {
        let s = &self.slots[slot.0];
        self.content_origin(s.owner) + s.position
    }

    /// World position `block` has while sitting at its place in `slot`.
    pub fn slot_offset(&self, slot: SlotId, block: BlockId) -> Point {
        self.slot_origin(slot) + self.blocks[block.0].position
    }

    /// World box of the block including connector reservations.
    pub fn block_rect(&self, block: BlockId) -> Rect {
        Rect::from_origin_size(self.absolute_origin(block), self.blocks[block.0].outer)
    }

    /// World box of the painted body.
    pub fn body_rect(&self, block: BlockId) -> Rect {
        Rect::from_origin_size(self.content_origin(block), self.blocks[block.0].body)
    }

    /// World box of a content element.
    pub fn element_rect(&self, block: BlockId, element: Element) -> Rect {
        let position = match element {
            Element::Slot(slot) => self.slots[slot.0].position,
            Element::Operator(op) => self.operators[op.0].position,
            Element::Text(text) => self.texts[text.0].position,
        };
        Rect::from_origin_size(self.content_origin(block) + position, self.element_size(element))
    }

    // === Pipe lines ===

    /// World point where pipes attach to an endpoint.
    pub fn pipe_anchor(&self, pipe_block: PipeBlockId) -> Point {
        let pb = &self.pipe_blocks[pipe_block.0];
        let content = self.content_origin(pb.owner);
        let r = self.config.pipe_radius;
        match pb.kind {
            PipeKind::BotOut => Point::new(
                content.x + pb.offset.x + r,
                content.y + self.blocks[pb.owner.0].body.height,
            ),
            PipeKind::TopIn | PipeKind::LeftIn | PipeKind::RightOut => {
                content + pb.offset + Point::new(r, r)
            }
        }
    }

    /// Refresh the lines of every pipe touching `block` or a block nested in
    /// its slots.
    pub(crate) fn refresh_pipes(&mut self, block: BlockId) {
        let mut stack = vec![block];
        while let Some(current) = stack.pop() {
            let pipe_blocks: Vec<PipeBlockId> = self.blocks[current.0].pipe_blocks().collect();
            for pb in pipe_blocks {
                self.refresh_pipe_block(pb);
            }
            let b = &self.blocks[current.0];
            for slot in b.slots() {
                stack.extend(self.slots[slot.0].inserts.iter().copied());
            }
        }
    }

    pub(crate) fn refresh_pipe_block(&mut self, pipe_block: PipeBlockId) {
        let anchor = self.pipe_anchor(pipe_block);
        let pb = &self.pipe_blocks[pipe_block.0];
        let is_input = pb.kind.is_input();
        for id in &pb.pipes {
            if let Some(pipe) = self.pipes.get_mut(id) {
                if is_input {
                    pipe.end = anchor;
                } else {
                    pipe.start = anchor;
                }
            }
        }
    }
}
