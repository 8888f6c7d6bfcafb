//! Parsed form of a zkASM source file, as handed to the compiler.

use std::fmt;

use smallvec::SmallVec;
use strum_macros::{Display, EnumString};

/// Registers of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Register {
    A,
    B,
    #[strum(serialize = "zkPC")]
    ZkPc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
}

/// Input side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Free input. Holds the raw tag text, `None` for a bare `$`.
    Tag(Option<String>),
    Reg(Register),
    Const(i128),
    ConstL(i128),
    Neg(Box<Operand>),
    Binary {
        op: BinaryOp,
        lhs: Box<Operand>,
        rhs: Box<Operand>,
    },
}

impl Operand {
    /// Short name of the operand shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Tag(_) => "tag",
            Operand::Reg(_) => "register",
            Operand::Const(_) => "constant",
            Operand::ConstL(_) => "long constant",
            Operand::Neg(_) => "negation",
            Operand::Binary { op, .. } => match op {
                BinaryOp::Add => "addition",
                BinaryOp::Sub => "subtraction",
                BinaryOp::Mul => "multiplication",
            },
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Tag(None) => write!(f, "$"),
            Operand::Tag(Some(tag)) => write!(f, "${{{}}}", tag),
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Const(value) | Operand::ConstL(value) => write!(f, "{}", value),
            Operand::Neg(inner) => write!(f, "-{}", inner),
            Operand::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}

/// Destination of a jump, before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpTarget {
    Label(String),
    Step(u64),
}

impl fmt::Display for JumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpTarget::Label(label) => write!(f, "{}", label),
            JumpTarget::Step(step) => write!(f, "{}", step),
        }
    }
}

/// Operation flag written after the `:` of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Add,
    Jmp(JumpTarget),
    Jmpz(JumpTarget),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "ADD"),
            Op::Jmp(target) => write!(f, "JMP({})", target),
            Op::Jmpz(target) => write!(f, "JMPZ({})", target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub input: Operand,
    pub outputs: SmallVec<[Register; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStep {
    pub assignment: Option<Assignment>,
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Step(ParsedStep),
    Label(String),
    /// A directive of the full zkASM dialect (`INCLUDE`, `VAR`, `CONST`).
    Directive { name: String, args: String },
}

/// One line of the program, with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub kind: LineKind,
    pub line: usize,
}

impl ParsedLine {
    pub fn step(line: usize, assignment: Option<Assignment>, ops: Vec<Op>) -> Self {
        Self {
            kind: LineKind::Step(ParsedStep { assignment, ops }),
            line,
        }
    }

    pub fn label(line: usize, name: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Label(name.into()),
            line,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self.kind, LineKind::Label(_))
    }

    pub fn label_name(&self) -> Option<&str> {
        if let LineKind::Label(name) = &self.kind {
            Some(name)
        } else {
            None
        }
    }
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LineKind::Label(label) => write!(f, "{}:", label),
            LineKind::Directive { name, args } => write!(f, "{} {}", name, args),
            LineKind::Step(step) => {
                if let Some(assignment) = &step.assignment {
                    write!(f, "{}", assignment.input)?;
                    if !assignment.outputs.is_empty() {
                        let outputs = assignment
                            .outputs
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>();
                        write!(f, " => {}", outputs.join(", "))?;
                    }
                    if !step.ops.is_empty() {
                        write!(f, " ")?;
                    }
                }
                if !step.ops.is_empty() {
                    let ops = step.ops.iter().map(ToString::to_string).collect::<Vec<_>>();
                    write!(f, ":{}", ops.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
