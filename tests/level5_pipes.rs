//! Level 5: Pipe Tests
//!
//! Tests dragging pipes from outputs to inputs, validation and removal.

#![cfg(feature = "pipes")]

mod common;

use common::harness::EditorHarness;
use slint_block_editor::{
    BlockId, EditorError, MaxPipesValidator, PipeBlockId, Point, PressTarget, ReleaseOutcome,
};

struct Wiring {
    harness: EditorHarness,
    source: BlockId,
    sink: BlockId,
    output: PipeBlockId,
    inputs: Vec<PipeBlockId>,
}

fn wiring() -> Wiring {
    let harness = EditorHarness::new();
    let source = harness.spawn("bot_pipe", 0.0, 0.0);
    let sink = harness.spawn("top_pipe", 300.0, 0.0);
    let (output, inputs) = {
        let graph = harness.graph();
        (
            *graph.block(source).bot_pipe_out.attached().unwrap(),
            graph.block(sink).top_pipes_in.items().to_vec(),
        )
    };
    Wiring { harness, source, sink, output, inputs }
}

fn drag_pipe(harness: &EditorHarness, output: PipeBlockId, to: Point) -> ReleaseOutcome {
    let from = harness.graph().pipe_anchor(output);
    harness.ctrl.press(from.x, from.y, PressTarget::PipeOutput(output));
    harness.ctrl.pointer_moved(to.x, to.y);
    harness.ctrl.release(to.x, to.y)
}

#[test]
fn test_pipe_commits_on_input() {
    let w = wiring();
    assert_eq!(w.inputs.len(), 2);

    let outcome = drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    let ReleaseOutcome::PipeCommitted(pipe) = outcome else {
        panic!("expected a committed pipe");
    };
    let graph = w.harness.graph();
    let p = graph.pipe(pipe).unwrap();
    assert_eq!(p.input, Some(w.inputs[0]));
    assert_eq!(p.start, Point::new(41.0, 50.0));
    assert_eq!(p.end, Point::new(341.0, 16.0));
    assert_eq!(graph.pipe_block(w.output).pipes, vec![pipe]);
    assert_eq!(graph.pipe_block(w.inputs[0]).pipes, vec![pipe]);
}

#[test]
fn test_pipe_follows_pointer_while_dragged() {
    let w = wiring();
    w.harness.ctrl.press(41.0, 50.0, PressTarget::PipeOutput(w.output));
    w.harness.ctrl.pointer_moved(120.0, 200.0);

    let graph = w.harness.graph();
    let (_, pipe) = graph.pipes().next().unwrap();
    assert!(!pipe.is_committed());
    assert_eq!(pipe.start, Point::new(41.0, 50.0));
    assert_eq!(pipe.end, Point::new(120.0, 200.0));
}

#[test]
fn test_release_over_nothing_discards_silently() {
    let w = wiring();

    let outcome = drag_pipe(&w.harness, w.output, Point::new(150.0, 400.0));

    assert!(matches!(outcome, ReleaseOutcome::PipeDiscarded));
    let graph = w.harness.graph();
    assert_eq!(graph.pipes().count(), 0);
    assert!(graph.pipe_block(w.output).pipes.is_empty());
    assert!(graph.diagnostics().is_empty());
}

#[test]
fn test_duplicate_pipe_is_rejected() {
    let w = wiring();
    drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    let outcome = drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    assert!(matches!(outcome, ReleaseOutcome::PipeDiscarded));
    let graph = w.harness.graph();
    assert_eq!(graph.pipes().count(), 1);
    assert!(matches!(graph.diagnostics().last(), Some(EditorError::PipeRejected(_))));
}

#[test]
fn test_second_input_accepts_same_output() {
    let w = wiring();
    drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    let outcome = drag_pipe(&w.harness, w.output, Point::new(390.0, 10.0));

    let ReleaseOutcome::PipeCommitted(pipe) = outcome else {
        panic!("expected a committed pipe");
    };
    let graph = w.harness.graph();
    assert_eq!(graph.pipe(pipe).unwrap().input, Some(w.inputs[1]));
    assert_eq!(graph.pipe_block(w.output).pipes.len(), 2);
}

#[test]
fn test_custom_validator_limits_pipes() {
    let w = wiring();
    w.harness.ctrl.set_validator(MaxPipesValidator::new(1));
    drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    let outcome = drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));
    assert!(matches!(outcome, ReleaseOutcome::PipeDiscarded));

    // the other input is still free
    let outcome = drag_pipe(&w.harness, w.output, Point::new(390.0, 10.0));
    assert!(matches!(outcome, ReleaseOutcome::PipeCommitted(_)));
    assert_eq!(w.harness.graph().pipes().count(), 2);
}

#[test]
fn test_moving_block_moves_pipe_ends() {
    let w = wiring();
    let ReleaseOutcome::PipeCommitted(pipe) =
        drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0))
    else {
        panic!("expected a committed pipe");
    };

    w.harness.drag(w.sink, Point::new(300.0, 200.0));
    w.harness.drag(w.source, Point::new(20.0, 0.0));

    let graph = w.harness.graph();
    let p = graph.pipe(pipe).unwrap();
    assert_eq!(p.start, Point::new(61.0, 50.0));
    assert_eq!(p.end, Point::new(341.0, 216.0));
}

#[test]
fn test_pipe_path_callback() {
    let w = wiring();
    let ReleaseOutcome::PipeCommitted(pipe) =
        drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0))
    else {
        panic!("expected a committed pipe");
    };
    let path = w.harness.ctrl.pipe_path_callback();

    assert_eq!(path(pipe.0 as i32).as_str(), "M 41 50 L 341 16");
    assert_eq!(path(99).as_str(), "");

    w.harness.ctrl.set_viewport(2.0, 0.0, 0.0);
    assert_eq!(path(pipe.0 as i32).as_str(), "M 82 100 L 682 32");
}

#[test]
fn test_remove_pipe_unlinks_both_ends() {
    let w = wiring();
    let ReleaseOutcome::PipeCommitted(pipe) =
        drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0))
    else {
        panic!("expected a committed pipe");
    };

    assert!(w.harness.ctrl.remove_pipe(pipe));
    assert!(!w.harness.ctrl.remove_pipe(pipe));

    let graph = w.harness.graph();
    assert!(graph.pipe(pipe).is_none());
    assert!(graph.pipe_block(w.output).pipes.is_empty());
    assert!(graph.pipe_block(w.inputs[0]).pipes.is_empty());
}

#[test]
fn test_removing_sink_removes_its_pipes() {
    let w = wiring();
    drag_pipe(&w.harness, w.output, Point::new(330.0, 10.0));

    w.harness.ctrl.remove_block(w.sink);

    let graph = w.harness.graph();
    assert_eq!(graph.pipes().count(), 0);
    assert!(graph.pipe_block(w.output).pipes.is_empty());
    assert!(!graph.registry().pipe_inputs().any(|pb| w.inputs.contains(&pb)));
}
