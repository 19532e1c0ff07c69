//! Scripted editing session without a window.
//!
//! Builds a small program by dragging palette blocks together, wires a pipe
//! and runs the resulting chain. Run with `RUST_LOG=debug` to trace every
//! snap decision.

use anyhow::Context;
use slint_block_editor::{
    BlockEditorController, BlockId, ButtonAction, ButtonPanel, ButtonResult, Point, PressTarget,
    ReleaseOutcome,
};

fn drag(ctrl: &BlockEditorController, block: BlockId, to: Point) -> ReleaseOutcome {
    let from = ctrl.graph().borrow().absolute_origin(block);
    ctrl.press(from.x, from.y, PressTarget::Block(block));
    ctrl.pointer_moved(to.x, to.y);
    ctrl.release(to.x, to.y)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctrl = BlockEditorController::new();
    ctrl.set_run_chain_on_release(false);

    let mut panel = ButtonPanel::for_palette(&ctrl);
    let head = match panel.press("b1_slot", &ctrl)? {
        ButtonResult::Spawned(block) => block,
        ButtonResult::Ran(_) => anyhow::bail!("spawn button ran a chain"),
    };
    ctrl.graph().borrow_mut().set_position(head, Point::ZERO);

    let inner = ctrl.spawn("lr1_slot", Point::new(300.0, 0.0))?;
    let tail = ctrl.spawn("tb2_slot1_op", Point::new(400.0, 300.0))?;

    // Left clip of `inner` onto the slot clip of `head`.
    drag(&ctrl, inner, Point::new(25.0, 1.0));
    // Top clip of `tail` onto the bottom clip of the grown `head`.
    drag(&ctrl, tail, Point::new(2.0, 152.0));

    let source = ctrl.spawn("bot_pipe", Point::new(600.0, 0.0))?;
    let sink = ctrl.spawn("top_pipe", Point::new(600.0, 200.0))?;
    let (output, from, to) = {
        let graph = ctrl.graph();
        let graph = graph.borrow();
        let output = graph
            .block(source)
            .bot_pipe_out
            .attached()
            .copied()
            .context("bot_pipe has no output")?;
        let input = *graph
            .block(sink)
            .top_pipes_in
            .items()
            .first()
            .context("top_pipe has no input")?;
        (output, graph.pipe_anchor(output), graph.pipe_anchor(input))
    };
    ctrl.press(from.x, from.y, PressTarget::PipeOutput(output));
    ctrl.pointer_moved(to.x, to.y);
    if let ReleaseOutcome::PipeCommitted(pipe) = ctrl.release(to.x, to.y) {
        println!("pipe: {}", ctrl.pipe_path_callback()(pipe.0 as i32));
    }

    for block in [head, tail] {
        let name = ctrl.graph().borrow().block(block).name.clone();
        ctrl.graph().borrow_mut().set_operation(block, move |id| {
            log::info!("running {name} ({id})");
            Ok(())
        });
    }

    panel.add("run", ButtonAction::RunChain(tail));
    if let ButtonResult::Ran(report) = panel.press("run", &ctrl)? {
        let names: Vec<String> = {
            let graph = ctrl.graph();
            let graph = graph.borrow();
            report.visited.iter().map(|b| graph.block(*b).name.clone()).collect()
        };
        println!("ran {} (failures: {})", names.join(" -> "), report.failures.len());
    }

    let graph = ctrl.graph();
    let graph = graph.borrow();
    for block in graph.paint_order() {
        let b = graph.block(block);
        let rect = graph.block_rect(block);
        println!(
            "{:>8} at ({}, {}) outer {}x{}",
            b.name, rect.x, rect.y, rect.width, rect.height
        );
    }
    for error in graph.diagnostics().iter() {
        println!("diagnostic: {error}");
    }

    Ok(())
}
