//! Pipe layer: in-flight pipes, commit/discard, validation and path commands.
//!
//! A pipe is started from an output endpoint, follows the pointer while
//! dragged and is committed only when released over an input endpoint that
//! passes the [`PipeValidator`]. Anything else discards it.
//!
//! # Example
//!
//! ```
//! use slint_block_editor::links::default_validator;
//! use slint_block_editor::{BlockGraph, ConnectorKind, Point};
//!
//! let mut graph = BlockGraph::new();
//! let source = graph.create_block("source").unwrap();
//! graph.add_connector(source, ConnectorKind::BotPipeOut).unwrap();
//! let sink = graph.create_block("sink").unwrap();
//! graph.add_connector(sink, ConnectorKind::TopPipeIn).unwrap();
//! graph.set_position(sink, Point::new(300.0, 0.0));
//!
//! let output = graph.block(source).bot_pipe_out.attached().copied().unwrap();
//! let pipe = graph.begin_pipe(output).unwrap();
//! graph.drag_pipe(pipe, Point::new(330.0, 10.0));
//! let committed = graph.release_pipe(pipe, Point::new(330.0, 10.0), &default_validator());
//!
//! assert_eq!(committed, Ok(Some(pipe)));
//! ```

use crate::error::EditorError;
use crate::geometry::{Point, ScreenTransform};
use crate::graph::BlockGraph;
use crate::hit_test::find_pipe_target_at;
use crate::model::{Pipe, PipeBlockId, PipeId};
use std::fmt;

/// Result of pipe validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(PipeValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why a pipe was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeValidationError {
    /// Endpoint is unknown or no longer registered
    PipeBlockNotFound(PipeBlockId),
    /// Both endpoints belong to the same block
    SameBlock,
    /// Pipes run from an output to an input
    IncompatibleDirection,
    /// A committed pipe between these endpoints already exists
    DuplicatePipe,
    /// Input endpoint has reached its pipe limit
    MaxPipesReached { pipe_block: PipeBlockId, max: usize },
    Custom(String),
}

impl fmt::Display for PipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PipeBlockNotFound(id) => write!(f, "{} not found", id),
            Self::SameBlock => write!(f, "Cannot pipe a block to itself"),
            Self::IncompatibleDirection => write!(f, "Must connect output to input"),
            Self::DuplicatePipe => write!(f, "Pipe already exists"),
            Self::MaxPipesReached { pipe_block, max } => {
                write!(f, "{} has reached max {} pipes", pipe_block, max)
            }
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

/// Custom pipe validation logic.
///
/// # Example
///
/// ```
/// use slint_block_editor::links::{PipeValidator, PipeValidationError, ValidationResult};
/// use slint_block_editor::{BlockGraph, PipeBlockId};
///
/// struct OnlyTopInputs;
///
/// impl PipeValidator for OnlyTopInputs {
///     fn validate(
///         &self,
///         _output: PipeBlockId,
///         input: PipeBlockId,
///         graph: &BlockGraph,
///     ) -> ValidationResult {
///         if graph.pipe_block(input).offset.y < 0.0 {
///             ValidationResult::Valid
///         } else {
///             ValidationResult::Invalid(PipeValidationError::Custom("top inputs only".into()))
///         }
///     }
/// }
/// ```
pub trait PipeValidator {
    /// Check whether a pipe from `output` to `input` may be committed.
    fn validate(
        &self,
        output: PipeBlockId,
        input: PipeBlockId,
        graph: &BlockGraph,
    ) -> ValidationResult;
}

/// Endpoints must exist, be registered, sit on different blocks and run
/// from an output to an input.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicPipeValidator;

impl PipeValidator for BasicPipeValidator {
    fn validate(
        &self,
        output: PipeBlockId,
        input: PipeBlockId,
        graph: &BlockGraph,
    ) -> ValidationResult {
        for id in [output, input] {
            let registered = graph.registry().pipe_inputs().any(|pb| pb == id)
                || graph.registry().pipe_outputs().any(|pb| pb == id);
            if !registered {
                return ValidationResult::Invalid(PipeValidationError::PipeBlockNotFound(id));
            }
        }

        let (out, inp) = (graph.pipe_block(output), graph.pipe_block(input));
        if out.owner == inp.owner {
            return ValidationResult::Invalid(PipeValidationError::SameBlock);
        }
        if !out.kind.is_output() || !inp.kind.is_input() {
            return ValidationResult::Invalid(PipeValidationError::IncompatibleDirection);
        }

        ValidationResult::Valid
    }
}

/// Refuses a second committed pipe between the same endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl PipeValidator for NoDuplicatesValidator {
    fn validate(
        &self,
        output: PipeBlockId,
        input: PipeBlockId,
        graph: &BlockGraph,
    ) -> ValidationResult {
        let duplicate = graph
            .pipes()
            .any(|(_, pipe)| pipe.output == output && pipe.input == Some(input));
        if duplicate {
            ValidationResult::Invalid(PipeValidationError::DuplicatePipe)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Caps the number of pipes an input accepts.
#[derive(Clone, Copy, Debug)]
pub struct MaxPipesValidator {
    max: usize,
}

impl MaxPipesValidator {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl PipeValidator for MaxPipesValidator {
    fn validate(
        &self,
        _output: PipeBlockId,
        input: PipeBlockId,
        graph: &BlockGraph,
    ) -> ValidationResult {
        if graph.pipe_block(input).pipes.len() >= self.max {
            ValidationResult::Invalid(PipeValidationError::MaxPipesReached {
                pipe_block: input,
                max: self.max,
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validators applied in order; the first error short-circuits.
///
/// ```
/// use slint_block_editor::links::{BasicPipeValidator, CompositeValidator, MaxPipesValidator};
///
/// let validator = CompositeValidator::new()
///     .add(BasicPipeValidator)
///     .add(MaxPipesValidator::new(4));
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn PipeValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self { validators: Vec::new() }
    }

    pub fn add<V: PipeValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl PipeValidator for CompositeValidator {
    fn validate(
        &self,
        output: PipeBlockId,
        input: PipeBlockId,
        graph: &BlockGraph,
    ) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(output, input, graph);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Basic rules plus duplicate rejection.
pub fn default_validator() -> CompositeValidator {
    CompositeValidator::new()
        .add(BasicPipeValidator)
        .add(NoDuplicatesValidator)
}

pub fn validate_pipe<V: PipeValidator + ?Sized>(
    output: PipeBlockId,
    input: PipeBlockId,
    graph: &BlockGraph,
    validator: &V,
) -> ValidationResult {
    validator.validate(output, input, graph)
}

impl BlockGraph {
    /// Start an in-flight pipe at an output endpoint.
    ///
    /// Returns `None` when `output` is not a registered output.
    pub fn begin_pipe(&mut self, output: PipeBlockId) -> Option<PipeId> {
        if !self.registry.pipe_outputs().any(|pb| pb == output) {
            log::debug!("{output} is not a pipe output");
            return None;
        }

        let id = PipeId(self.next_pipe);
        self.next_pipe += 1;
        let anchor = self.pipe_anchor(output);
        self.pipes.insert(id, Pipe { output, input: None, start: anchor, end: anchor });
        self.pipe_blocks[output.0].pipes.push(id);
        log::debug!("started {id} from {output}");
        Some(id)
    }

    /// Move the free end of an in-flight pipe.
    pub fn drag_pipe(&mut self, pipe: PipeId, point: Point) {
        if let Some(p) = self.pipes.get_mut(&pipe).filter(|p| !p.is_committed()) {
            p.end = point;
        }
    }

    /// Commit an in-flight pipe to the input under `point`, or discard it.
    ///
    /// Releasing over nothing discards silently and returns `Ok(None)`. A
    /// target refused by the validator discards the pipe and reports
    /// [`EditorError::PipeRejected`].
    pub fn release_pipe<V: PipeValidator + ?Sized>(
        &mut self,
        pipe: PipeId,
        point: Point,
        validator: &V,
    ) -> Result<Option<PipeId>, EditorError> {
        let Some(output) = self.pipes.get(&pipe).filter(|p| !p.is_committed()).map(|p| p.output)
        else {
            return Ok(None);
        };

        let Some(target) = find_pipe_target_at(self, point) else {
            log::debug!("{pipe} released over nothing, discarding");
            self.remove_pipe(pipe);
            return Ok(None);
        };

        if let ValidationResult::Invalid(reason) = validator.validate(output, target, self) {
            self.remove_pipe(pipe);
            return self.reject(EditorError::PipeRejected(reason.to_string()));
        }

        if let Some(p) = self.pipes.get_mut(&pipe) {
            p.input = Some(target);
        }
        self.pipe_blocks[target.0].pipes.push(pipe);
        self.refresh_pipe_block(target);
        self.refresh_pipe_block(output);
        log::debug!("committed {pipe}: {output} -> {target}");
        Ok(Some(pipe))
    }

    /// Drop an in-flight pipe. Committed pipes are left alone.
    pub fn discard_pipe(&mut self, pipe: PipeId) -> bool {
        match self.pipes.get(&pipe) {
            Some(p) if !p.is_committed() => self.remove_pipe(pipe),
            _ => false,
        }
    }

    /// SVG path commands for a pipe line in screen space.
    pub fn pipe_path(&self, pipe: PipeId, transform: &ScreenTransform) -> Option<String> {
        let p = self.pipes.get(&pipe)?;
        let start = transform.to_screen(p.start);
        let end = transform.to_screen(p.end);
        Some(format!("M {} {} L {} {}", start.x, start.y, end.x, end.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockId, ConnectorKind};

    struct Fixture {
        graph: BlockGraph,
        source: BlockId,
        sink: BlockId,
        output: PipeBlockId,
        input: PipeBlockId,
    }

    fn fixture() -> Fixture {
        let mut graph = BlockGraph::new();
        let source = graph.create_block("source").unwrap();
        graph.add_connector(source, ConnectorKind::BotPipeOut).unwrap();
        let sink = graph.create_block("sink").unwrap();
        graph.add_connector(sink, ConnectorKind::TopPipeIn).unwrap();
        graph.set_position(sink, Point::new(300.0, 0.0));

        let output = graph.block(source).bot_pipe_out.attached().copied().unwrap();
        let input = graph.block(sink).top_pipes_in.items()[0];
        Fixture { graph, source, sink, output, input }
    }

    #[test]
    fn test_begin_pipe_starts_at_output_anchor() {
        let mut f = fixture();

        let pipe = f.graph.begin_pipe(f.output).unwrap();

        let p = f.graph.pipe(pipe).unwrap();
        assert_eq!(p.start, Point::new(41.0, 100.0));
        assert_eq!(p.end, p.start);
        assert!(!p.is_committed());
        assert_eq!(f.graph.pipe_block(f.output).pipes, vec![pipe]);
    }

    #[test]
    fn test_begin_pipe_from_input_is_refused() {
        let mut f = fixture();
        assert_eq!(f.graph.begin_pipe(f.input), None);
        assert_eq!(f.graph.pipes().count(), 0);
    }

    #[test]
    fn test_release_over_input_commits() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();
        f.graph.drag_pipe(pipe, Point::new(330.0, 10.0));

        let result = f.graph.release_pipe(pipe, Point::new(330.0, 10.0), &default_validator());

        assert_eq!(result, Ok(Some(pipe)));
        let p = f.graph.pipe(pipe).unwrap();
        assert_eq!(p.input, Some(f.input));
        assert_eq!(p.end, Point::new(341.0, 16.0));
        assert_eq!(f.graph.pipe_block(f.input).pipes, vec![pipe]);
    }

    #[test]
    fn test_release_over_nothing_discards_silently() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();

        let result = f.graph.release_pipe(pipe, Point::new(-500.0, -500.0), &default_validator());

        assert_eq!(result, Ok(None));
        assert!(f.graph.pipe(pipe).is_none());
        assert!(f.graph.pipe_block(f.output).pipes.is_empty());
        assert!(f.graph.diagnostics().is_empty());
    }

    #[test]
    fn test_duplicate_pipe_is_rejected() {
        let mut f = fixture();
        let first = f.graph.begin_pipe(f.output).unwrap();
        f.graph.release_pipe(first, Point::new(330.0, 10.0), &default_validator()).unwrap();

        let second = f.graph.begin_pipe(f.output).unwrap();
        let result = f.graph.release_pipe(second, Point::new(330.0, 10.0), &default_validator());

        assert!(matches!(result, Err(EditorError::PipeRejected(_))));
        assert!(f.graph.pipe(second).is_none());
        assert_eq!(f.graph.pipe_block(f.input).pipes, vec![first]);
        assert_eq!(f.graph.diagnostics().len(), 1);
    }

    #[test]
    fn test_same_block_is_rejected() {
        let mut graph = BlockGraph::new();
        let block = graph.create_block("loop").unwrap();
        graph.add_connector(block, ConnectorKind::TopPipeIn).unwrap();
        graph.add_connector(block, ConnectorKind::BotPipeOut).unwrap();
        let output = graph.block(block).bot_pipe_out.attached().copied().unwrap();
        let input = graph.block(block).top_pipes_in.items()[0];

        assert_eq!(
            BasicPipeValidator.validate(output, input, &graph),
            ValidationResult::Invalid(PipeValidationError::SameBlock)
        );
    }

    #[test]
    fn test_output_to_output_is_rejected() {
        let mut f = fixture();
        let other = f.graph.create_block("other").unwrap();
        f.graph.add_connector(other, ConnectorKind::RightPipeOut).unwrap();
        let second_output = f.graph.block(other).right_pipe_out.attached().copied().unwrap();

        assert_eq!(
            BasicPipeValidator.validate(f.output, second_output, &f.graph),
            ValidationResult::Invalid(PipeValidationError::IncompatibleDirection)
        );
    }

    #[test]
    fn test_max_pipes_validator() {
        let mut f = fixture();
        let validator = CompositeValidator::new()
            .add(BasicPipeValidator)
            .add(MaxPipesValidator::new(1));
        let first = f.graph.begin_pipe(f.output).unwrap();
        f.graph.release_pipe(first, Point::new(330.0, 10.0), &validator).unwrap();

        assert!(matches!(
            validate_pipe(f.output, f.input, &f.graph, &validator),
            ValidationResult::Invalid(PipeValidationError::MaxPipesReached { max: 1, .. })
        ));
    }

    #[test]
    fn test_remove_pipe_clears_both_endpoints() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();
        f.graph.release_pipe(pipe, Point::new(330.0, 10.0), &default_validator()).unwrap();

        assert!(f.graph.remove_pipe(pipe));

        assert!(f.graph.pipe_block(f.output).pipes.is_empty());
        assert!(f.graph.pipe_block(f.input).pipes.is_empty());
        assert!(!f.graph.remove_pipe(pipe));
    }

    #[test]
    fn test_committed_pipe_follows_moved_block() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();
        f.graph.release_pipe(pipe, Point::new(330.0, 10.0), &default_validator()).unwrap();

        f.graph.set_position(f.sink, Point::new(400.0, 50.0));
        f.graph.set_position(f.source, Point::new(10.0, 0.0));

        let p = f.graph.pipe(pipe).unwrap();
        assert_eq!(p.end, Point::new(441.0, 66.0));
        assert_eq!(p.start, Point::new(51.0, 100.0));
    }

    #[test]
    fn test_discard_leaves_committed_pipes() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();
        f.graph.release_pipe(pipe, Point::new(330.0, 10.0), &default_validator()).unwrap();

        assert!(!f.graph.discard_pipe(pipe));
        assert!(f.graph.pipe(pipe).is_some());
    }

    #[test]
    fn test_pipe_path_uses_transform() {
        let mut f = fixture();
        let pipe = f.graph.begin_pipe(f.output).unwrap();
        f.graph.drag_pipe(pipe, Point::new(100.0, 200.0));

        let identity = f.graph.pipe_path(pipe, &ScreenTransform::identity()).unwrap();
        assert_eq!(identity, "M 41 100 L 100 200");

        let zoomed = ScreenTransform::from_viewport(2.0, 10.0, 0.0);
        assert_eq!(f.graph.pipe_path(pipe, &zoomed).unwrap(), "M 92 200 L 210 400");
    }
}
