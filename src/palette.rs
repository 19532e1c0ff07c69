//! Built-in block factories and the palette that instantiates them.
//!
//! Every factory builds a pre-wired top-level block from a fresh name and
//! returns its handle. Connectors are attached in a fixed order since later
//! attaches depend on the size earlier ones produced.

use crate::error::EditorError;
use crate::geometry::Point;
use crate::graph::BlockGraph;
use crate::model::{BlockId, ConnectorKind};
use indexmap::IndexMap;

/// Builds one block into a graph under the given name.
pub type BlockFactory = Box<dyn Fn(&mut BlockGraph, &str) -> Result<BlockId, EditorError>>;

/// Bottom clip and one slot.
pub fn block_b1_slot(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.add_connector(block, ConnectorKind::BotClipOut)?;
    graph.add_slot(block);
    Ok(block)
}

/// One slot between a left and a right clip.
pub fn block_lr1_slot(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.add_slot(block);
    graph.add_connector(block, ConnectorKind::LeftClipOut)?;
    graph.add_connector(block, ConnectorKind::RightClipIn)?;
    Ok(block)
}

/// Two slots around an operator, chained vertically.
pub fn block_tb2_slot1_op(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.add_slot(block);
    graph.add_operator(block);
    graph.add_slot(block);
    graph.add_connector(block, ConnectorKind::TopClipIn)?;
    graph.add_connector(block, ConnectorKind::BotClipOut)?;
    Ok(block)
}

/// Three slots separated by operators, chained horizontally.
pub fn block_lr3_slot2_op(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.add_slot(block);
    graph.add_operator(block);
    graph.add_slot(block);
    graph.add_operator(block);
    graph.add_slot(block);
    graph.add_connector(block, ConnectorKind::LeftClipOut)?;
    graph.add_connector(block, ConnectorKind::RightClipIn)?;
    Ok(block)
}

/// Flat block with `inputs` pipe inputs along its top edge.
pub fn top_pipe(graph: &mut BlockGraph, name: &str, inputs: usize) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.set_size(block, Some(100.0), Some(50.0));
    graph.add_connector(block, ConnectorKind::BotClipOut)?;
    for _ in 0..inputs {
        graph.add_connector(block, ConnectorKind::TopPipeIn)?;
    }
    Ok(block)
}

pub fn bot_pipe(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.set_size(block, Some(100.0), Some(50.0));
    graph.add_connector(block, ConnectorKind::TopClipIn)?;
    graph.add_connector(block, ConnectorKind::BotPipeOut)?;
    Ok(block)
}

/// Narrow block with `inputs` pipe inputs along its left edge.
pub fn left_pipe(
    graph: &mut BlockGraph,
    name: &str,
    inputs: usize,
) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.set_size(block, Some(50.0), Some(100.0));
    graph.add_connector(block, ConnectorKind::RightClipIn)?;
    for _ in 0..inputs {
        graph.add_connector(block, ConnectorKind::LeftPipeIn)?;
    }
    Ok(block)
}

pub fn right_pipe(graph: &mut BlockGraph, name: &str) -> Result<BlockId, EditorError> {
    let block = graph.create_block(name)?;
    graph.set_size(block, Some(50.0), Some(100.0));
    graph.add_connector(block, ConnectorKind::LeftClipOut)?;
    graph.add_connector(block, ConnectorKind::RightPipeOut)?;
    Ok(block)
}

/// Named block factories in insertion order.
///
/// # Example
///
/// ```
/// use slint_block_editor::{BlockGraph, Palette, Point};
///
/// let mut graph = BlockGraph::new();
/// let mut palette = Palette::with_builtins();
///
/// let block = palette.spawn(&mut graph, "lr1_slot", Point::new(40.0, 40.0)).unwrap();
/// assert_eq!(graph.block(block).name, "block1");
/// ```
pub struct Palette {
    entries: IndexMap<String, BlockFactory>,
    spawned: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// An empty palette.
    pub fn new() -> Self {
        Self { entries: IndexMap::new(), spawned: 0 }
    }

    /// The eight built-in blocks. Pipe blocks with inputs get two of them.
    pub fn with_builtins() -> Self {
        let mut palette = Self::new();
        palette.register("b1_slot", block_b1_slot);
        palette.register("lr1_slot", block_lr1_slot);
        palette.register("lr3_slot2_op", block_lr3_slot2_op);
        palette.register("tb2_slot1_op", block_tb2_slot1_op);
        palette.register("top_pipe", |graph, name| top_pipe(graph, name, 2));
        palette.register("bot_pipe", bot_pipe);
        palette.register("left_pipe", |graph, name| left_pipe(graph, name, 2));
        palette.register("right_pipe", right_pipe);
        palette
    }

    /// Add or replace an entry.
    pub fn register<F>(&mut self, entry: &str, factory: F)
    where
        F: Fn(&mut BlockGraph, &str) -> Result<BlockId, EditorError> + 'static,
    {
        self.entries.insert(entry.to_string(), Box::new(factory));
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains_key(entry)
    }

    /// Instantiate an entry under the next free `block{n}` name and move it
    /// to `at`.
    pub fn spawn(
        &mut self,
        graph: &mut BlockGraph,
        entry: &str,
        at: Point,
    ) -> Result<BlockId, EditorError> {
        let Some(factory) = self.entries.get(entry) else {
            return graph.reject(EditorError::UnknownPaletteEntry(entry.to_string()));
        };

        let name = loop {
            self.spawned += 1;
            let name = format!("block{}", self.spawned);
            if graph.find(&name).is_none() {
                break name;
            }
        };

        let block = factory(graph, &name)?;
        graph.set_position(block, at);
        log::debug!("spawned {entry} as {block} ({name})");
        Ok(block)
    }
}
