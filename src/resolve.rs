//! Connection resolver.
//!
//! Turns clip collisions into chain links or slot insertions and reflows the
//! affected blocks. A commit is one-directional: once linked, a pair is only
//! separated by [`BlockGraph::detach`] or [`BlockGraph::pop_out`].

use crate::graph::BlockGraph;
use crate::hit_test::{find_collision, Collision, COLLISION_ORDER};
use crate::model::{BlockId, ClipKind, ClipOwner, SlotId};
use std::collections::{HashMap, HashSet};

impl BlockGraph {
    /// Resolve the first hit of each of the block's clip roles.
    ///
    /// Returns the collisions that produced a new connection.
    pub fn check_collision(&mut self, block: BlockId) -> Vec<Collision> {
        let mut committed = Vec::new();
        for role in COLLISION_ORDER {
            let Some(hit) = find_collision(self, block, role) else {
                continue;
            };
            log::debug!("{block}: {:?} clip {} hit {}", role, hit.own, hit.target);
            if self.resolve(block, hit) {
                committed.push(hit);
            }
        }
        committed
    }

    /// [`check_collision`](Self::check_collision) for the block and every
    /// member of its down/right closure (collected before resolving).
    pub fn check_all_collision(&mut self, block: BlockId) -> Vec<Collision> {
        let members = self.connected(block);
        members
            .into_iter()
            .flat_map(|member| self.check_collision(member))
            .collect()
    }

    fn resolve(&mut self, block: BlockId, hit: Collision) -> bool {
        let target_owner = self.clip(hit.target).owner;
        let target_block = self.clip_owner_block(hit.target);
        match hit.role {
            ClipKind::BotOut => self.resolve_vertical(block, target_block),
            ClipKind::TopIn => self.resolve_vertical(target_block, block),
            ClipKind::RightIn => self.resolve_horizontal(ClipOwner::Block(block), target_block),
            ClipKind::LeftOut => self.resolve_horizontal(target_owner, block),
        }
    }

    /// Hang `bot` below `top`.
    ///
    /// Refused when either side is already linked or the link would close a
    /// cycle.
    pub fn resolve_vertical(&mut self, top: BlockId, bot: BlockId) -> bool {
        if self.blocks[top.0].down.is_some() || self.blocks[bot.0].up.is_some() {
            return false;
        }
        if self.reaches(bot, top) {
            log::debug!("refusing {top} -> {bot}: cycle");
            return false;
        }

        self.blocks[bot.0].position = self.below(top, bot);
        self.blocks[top.0].down = Some(bot);
        self.blocks[bot.0].up = Some(top);
        self.set_connected(bot);
        log::debug!("linked {bot} below {top}");
        true
    }

    /// Join `right` to the owner of a right-receiving clip.
    ///
    /// - a top-level block: `right` is placed against it and the chain is
    ///   equalized;
    /// - an empty slot: `right` (with its right chain) is inserted;
    /// - a block inside a slot: `right` is linked, then inserted into the
    ///   same slot.
    ///
    /// A populated slot refuses, as does anything that would nest a block
    /// inside itself.
    pub fn resolve_horizontal(&mut self, left: ClipOwner, right: BlockId) -> bool {
        let r = &self.blocks[right.0];
        if r.left.is_some() || r.parent.is_some() {
            return false;
        }

        match left {
            ClipOwner::Slot(slot) => {
                let s = &self.slots[slot.0];
                if !s.inserts.is_empty() || self.reaches(right, s.owner) {
                    return false;
                }
                self.pop_in(slot, right);
                log::debug!("inserted {right} into {slot}");
                true
            }
            ClipOwner::Block(left) => {
                if left == right
                    || self.blocks[left.0].right.is_some()
                    || self.reaches(right, left)
                {
                    return false;
                }
                match self.blocks[left.0].parent {
                    None => {
                        self.blocks[right.0].position = self.right_of(left);
                        self.link_horizontal(left, right);
                        self.make_all_equal_height(right);
                    }
                    Some(slot) => {
                        self.link_horizontal(left, right);
                        self.make_all_equal_height(right);
                        self.pop_in(slot, right);
                    }
                }
                log::debug!("linked {right} right of {left}");
                true
            }
        }
    }

    fn link_horizontal(&mut self, left: BlockId, right: BlockId) {
        self.blocks[left.0].right = Some(right);
        self.blocks[right.0].left = Some(left);
    }

    /// Append `block` and its right chain to a slot.
    pub fn pop_in(&mut self, slot: SlotId, block: BlockId) {
        let mut seen = HashSet::new();
        let mut current = Some(block);
        while let Some(insert) = current.filter(|b| seen.insert(*b)) {
            self.slots[slot.0].inserts.push(insert);
            self.blocks[insert.0].parent = Some(slot);
            self.paint_order.shift_remove(&insert);
            current = self.blocks[insert.0].right;
        }
        self.fit_inserts(slot);
    }

    /// Release `block` and every insert after it, keeping their absolute
    /// positions.
    pub fn pop_out(&mut self, slot: SlotId, block: BlockId) {
        let inserts = self.slots[slot.0].inserts.clone();
        if !inserts.contains(&block) {
            return;
        }
        let absolute: HashMap<BlockId, _> = inserts
            .iter()
            .map(|insert| (*insert, self.slot_offset(slot, *insert)))
            .collect();

        while let Some(popped) = self.slots[slot.0].inserts.pop() {
            let b = &mut self.blocks[popped.0];
            b.parent = None;
            if let Some(position) = absolute.get(&popped) {
                b.position = *position;
            }
            self.paint_order.insert(popped);
            if popped == block {
                break;
            }
        }

        self.fit_inserts(slot);
        log::debug!("released {block} from {slot}");
    }

    /// Unlink a block from its `up` and `left` neighbors.
    pub fn detach(&mut self, block: BlockId) {
        let b = &mut self.blocks[block.0];
        let (up, left) = (b.up.take(), b.left.take());

        if let Some(up) = up {
            self.blocks[up.0].down = None;
        }
        if let Some(left) = left {
            self.blocks[left.0].right = None;
            self.make_all_equal_height(left);
        }
    }
}
