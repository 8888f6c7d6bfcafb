//! Two-pass compiler from parsed zkASM lines to trace-step descriptors.
//!
//! The first pass lowers every step and records label positions, the second
//! resolves jump labels into absolute step indices.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, instrument};

mod error;
mod lowering;
mod step;

pub use error::{CompileError, CompileErrorKind};
pub use lowering::{lower_input, lower_op, lower_outputs};
pub use step::{FreeIn, StepFragment, TraceStep};

use crate::parser::{JumpTarget, LineKind, ParsedLine, ParsedStep};

/// A mapping from label names to the index of the step that follows them.
pub type Labels = AHashMap<String, usize>;

/// The compiled program: ordered steps plus the label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    steps: Vec<TraceStep>,
    labels: Labels,
}

impl CompiledProgram {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&TraceStep> {
        self.steps.get(index)
    }

    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Step index a label points to.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A step after the first pass, before label resolution.
#[derive(Debug)]
struct StepDraft {
    fragment: StepFragment,
    line: usize,
}

/// Compiler state threaded through both passes.
struct Compiler<'a> {
    file_name: Arc<str>,
    src_lines: Vec<&'a str>,
    defined_labels: Labels,
    out: Vec<StepDraft>,
}

impl<'a> Compiler<'a> {
    fn new(file_name: &str, source: &'a str) -> Self {
        Self {
            file_name: Arc::from(file_name),
            src_lines: source.lines().collect(),
            defined_labels: Labels::default(),
            out: Vec::new(),
        }
    }

    fn error(&self, line: usize, kind: CompileErrorKind) -> CompileError {
        CompileError::new(self.file_name.clone(), line, kind)
    }

    fn compile_line(&mut self, line: &ParsedLine) -> Result<(), CompileError> {
        match &line.kind {
            LineKind::Step(step) => {
                let fragment = self
                    .assemble_step(step)
                    .map_err(|kind| self.error(line.line, kind))?;
                self.out.push(StepDraft {
                    fragment,
                    line: line.line,
                });
            }
            LineKind::Label(id) => {
                if self.defined_labels.contains_key(id) {
                    return Err(self.error(line.line, CompileErrorKind::RedefinedLabel(id.clone())));
                }
                self.defined_labels.insert(id.clone(), self.out.len());
            }
            LineKind::Directive { name, .. } => {
                return Err(self.error(
                    line.line,
                    CompileErrorKind::InvalidLineType(name.to_lowercase()),
                ));
            }
        }
        Ok(())
    }

    fn assemble_step(&self, step: &ParsedStep) -> Result<StepFragment, CompileErrorKind> {
        let mut fragment = StepFragment::default();
        if let Some(assignment) = &step.assignment {
            fragment.merge(lower_input(&assignment.input, self.out.len())?);
            fragment.merge(lower_outputs(&assignment.outputs)?);
        }
        for op in &step.ops {
            fragment.merge(lower_op(op));
        }
        Ok(fragment)
    }

    fn line_str(&self, line: usize) -> String {
        line.checked_sub(1)
            .and_then(|index| self.src_lines.get(index))
            .map_or_else(String::new, |text| text.to_string())
    }

    /// Second pass: resolves jump labels and finalizes every step.
    fn finish(self) -> Result<CompiledProgram, CompileError> {
        let mut steps = Vec::with_capacity(self.out.len());

        for draft in &self.out {
            let StepFragment {
                in_a,
                in_b,
                in_free,
                set_a,
                set_b,
                constant,
                constant_l,
                free_in,
                add,
                jmp,
                jmpz,
                offset,
            } = draft.fragment.clone();

            let (offset, offset_label) = match offset {
                None => (None, None),
                Some(JumpTarget::Step(step)) => (Some(step), None),
                Some(JumpTarget::Label(label)) => {
                    let target = self.defined_labels.get(&label).ok_or_else(|| {
                        self.error(draft.line, CompileErrorKind::UndefinedLabel(label.clone()))
                    })?;
                    (Some(*target as u64), Some(label))
                }
            };

            steps.push(TraceStep {
                in_a,
                in_b,
                in_free,
                set_a,
                set_b,
                constant,
                constant_l,
                free_in,
                add,
                jmp,
                jmpz,
                offset,
                offset_label,
                line: draft.line,
                file_name: self.file_name.clone(),
                line_str: self.line_str(draft.line),
            });
        }

        Ok(CompiledProgram {
            steps,
            labels: self.defined_labels,
        })
    }
}

/// Compiles parsed lines into a program.
///
/// `source` is the text the lines were parsed from; it only feeds the
/// `line_str` diagnostics and may be empty.
#[instrument(level = "info", skip_all, fields(file = file_name, lines = lines.len()))]
pub fn compile(
    lines: &[ParsedLine],
    file_name: &str,
    source: &str,
) -> Result<CompiledProgram, CompileError> {
    let mut compiler = Compiler::new(file_name, source);
    for line in lines {
        compiler.compile_line(line)?;
    }
    let program = compiler.finish()?;
    debug!(
        steps = program.len(),
        labels = program.labels().len(),
        "compiled program"
    );
    Ok(program)
}
