//! Chain execution.
//!
//! Operations run strictly one after another in preorder (self, right chain,
//! down chain). A failing operation is logged and recorded; the walk goes on.

use crate::graph::BlockGraph;
use crate::model::{BlockId, Operation};
use std::collections::HashSet;

/// Outcome of running a chain.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Blocks in the order they were reached, with or without an operation.
    pub visited: Vec<BlockId>,
    pub failures: Vec<(BlockId, anyhow::Error)>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl BlockGraph {
    /// Top-left block of the chain containing `block`: walk `left` to the
    /// leftmost, then `up` to the top, until neither moves.
    pub fn chain_origin(&self, block: BlockId) -> BlockId {
        let mut seen = HashSet::from([block]);
        let mut current = block;
        loop {
            let b = &self.blocks[current.0];
            match b.left.or(b.up) {
                Some(next) if seen.insert(next) => current = next,
                _ => return current,
            }
        }
    }

    /// Blocks run from `origin`, in order.
    pub fn execution_plan(&self, origin: BlockId) -> Vec<BlockId> {
        self.connected(origin)
    }

    /// The plan paired with each block's operation, detached from the graph
    /// so the operations can run without holding a borrow of it.
    pub fn execution_steps(&self, origin: BlockId) -> Vec<(BlockId, Option<Operation>)> {
        self.execution_plan(origin)
            .into_iter()
            .map(|block| (block, self.operation(block)))
            .collect()
    }

    /// Run `block` and everything hanging off it.
    pub fn run(&self, block: BlockId) -> ExecutionReport {
        run_steps(self.execution_steps(block))
    }

    /// Run the whole chain containing `block`.
    pub fn run_chain(&self, block: BlockId) -> ExecutionReport {
        self.run(self.chain_origin(block))
    }
}

pub fn run_steps(steps: Vec<(BlockId, Option<Operation>)>) -> ExecutionReport {
    let mut report = ExecutionReport::default();
    for (block, op) in steps {
        report.visited.push(block);
        let Some(op) = op else { continue };
        if let Err(err) = op(block) {
            log::error!("operation of {block} failed: {err:#}");
            report.failures.push((block, err));
        }
    }
    report
}
