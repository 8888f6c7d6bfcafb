//! zkASM front end.
//!
//! Turns source text into the ordered [`ParsedLine`] list consumed by the
//! compiler. Only syntax is checked here; operand shapes and labels are
//! validated by the compiler.

use std::str::FromStr;

use pest::{iterators::Pair, Parser};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::instrument;

mod ast;

pub use ast::{
    Assignment, BinaryOp, JumpTarget, LineKind, Op, Operand, ParsedLine, ParsedStep, Register,
};

#[derive(pest_derive::Parser)]
#[grammar = "parser/zkasm.pest"]
pub(crate) struct ZkasmParser;

/// Largest literal encoded as a short constant, larger ones use the long
/// form.
const SHORT_CONST_MAX: i128 = i32::MAX as i128;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),

    #[error("line {line}: literal `{literal}` does not fit in 128 bits")]
    BadNumber { line: usize, literal: String },

    #[error("line {line}: unexpected token `{token}`")]
    UnexpectedToken { line: usize, token: String },
}

#[inline]
fn get_first_inner<'a>(pair: Pair<'a, Rule>, msg: &str) -> Pair<'a, Rule> {
    pair.into_inner().next().expect(msg)
}

#[inline]
fn line_of(pair: &Pair<'_, Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn unexpected(pair: &Pair<'_, Rule>) -> ParseError {
    ParseError::UnexpectedToken {
        line: line_of(pair),
        token: pair.as_str().to_string(),
    }
}

fn parse_number(pair: &Pair<'_, Rule>) -> Result<i128, ParseError> {
    let literal = pair.as_str();
    let parsed = match literal.strip_prefix("0x") {
        Some(hex) => i128::from_str_radix(hex, 16),
        None => literal.parse::<i128>(),
    };
    parsed.map_err(|_| ParseError::BadNumber {
        line: line_of(pair),
        literal: literal.to_string(),
    })
}

fn parse_register(pair: &Pair<'_, Rule>) -> Register {
    Register::from_str(pair.as_str()).expect("grammar only admits known registers")
}

fn parse_primary(pair: Pair<'_, Rule>) -> Result<Operand, ParseError> {
    let inner = get_first_inner(pair, "primary has a value");
    match inner.as_rule() {
        Rule::tag => {
            let text = inner
                .into_inner()
                .next()
                .map(|text| text.as_str().trim().to_string())
                .filter(|text| !text.is_empty());
            Ok(Operand::Tag(text))
        }
        Rule::number => {
            let value = parse_number(&inner)?;
            if value > SHORT_CONST_MAX {
                Ok(Operand::ConstL(value))
            } else {
                Ok(Operand::Const(value))
            }
        }
        Rule::register => Ok(Operand::Reg(parse_register(&inner))),
        Rule::expr => parse_expr(inner),
        _ => Err(unexpected(&inner)),
    }
}

fn parse_unary(pair: Pair<'_, Rule>) -> Result<Operand, ParseError> {
    let inner = get_first_inner(pair, "unary has a value");
    match inner.as_rule() {
        Rule::neg => {
            let operand = parse_unary(get_first_inner(inner, "negation has an operand"))?;
            Ok(Operand::Neg(Box::new(operand)))
        }
        Rule::primary => parse_primary(inner),
        _ => Err(unexpected(&inner)),
    }
}

// Binary operators are left-associative and share one precedence level.
fn parse_expr(pair: Pair<'_, Rule>) -> Result<Operand, ParseError> {
    let mut inner = pair.into_inner();
    let mut lhs = parse_unary(inner.next().expect("expr has a first operand"))?;

    while let Some(bin_op) = inner.next() {
        let op = match bin_op.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            _ => return Err(unexpected(&bin_op)),
        };
        let rhs = parse_unary(inner.next().expect("binary operator has a right operand"))?;
        lhs = Operand::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }

    Ok(lhs)
}

fn parse_jump_target(pair: Pair<'_, Rule>) -> Result<JumpTarget, ParseError> {
    let target = get_first_inner(pair, "jump has a target");
    match target.as_rule() {
        Rule::number => {
            let value = parse_number(&target)?;
            let step = u64::try_from(value).map_err(|_| ParseError::BadNumber {
                line: line_of(&target),
                literal: target.as_str().to_string(),
            })?;
            Ok(JumpTarget::Step(step))
        }
        Rule::identifier => Ok(JumpTarget::Label(target.as_str().to_string())),
        _ => Err(unexpected(&target)),
    }
}

fn parse_op(pair: Pair<'_, Rule>) -> Result<Op, ParseError> {
    let op = get_first_inner(pair, "op has a kind");
    match op.as_rule() {
        Rule::add_op => Ok(Op::Add),
        Rule::jmpz_op => Ok(Op::Jmpz(parse_jump_target(op)?)),
        Rule::jmp_op => Ok(Op::Jmp(parse_jump_target(op)?)),
        _ => Err(unexpected(&op)),
    }
}

fn parse_step(pair: Pair<'_, Rule>, line: usize) -> Result<ParsedLine, ParseError> {
    let mut assignment = None;
    let mut ops = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::assignment => {
                let mut inner = part.into_inner();
                let input = parse_expr(inner.next().expect("assignment has an input"))?;
                let outputs = inner
                    .next()
                    .expect("assignment has outputs")
                    .into_inner()
                    .map(|reg| parse_register(&reg))
                    .collect::<SmallVec<_>>();
                assignment = Some(Assignment { input, outputs });
            }
            // An expression with no destination still drives `op`.
            Rule::expr => {
                assignment = Some(Assignment {
                    input: parse_expr(part)?,
                    outputs: SmallVec::new(),
                });
            }
            Rule::op_list => {
                for op in part.into_inner() {
                    ops.push(parse_op(op)?);
                }
            }
            _ => return Err(unexpected(&part)),
        }
    }

    Ok(ParsedLine::step(line, assignment, ops))
}

fn parse_line(pair: Pair<'_, Rule>) -> Result<ParsedLine, ParseError> {
    let line = line_of(&pair);
    let statement = get_first_inner(pair, "line has a statement");
    match statement.as_rule() {
        Rule::label => {
            let label_def = get_first_inner(statement, "label has a definition");
            let name = get_first_inner(label_def, "label has a name");
            Ok(ParsedLine::label(line, name.as_str()))
        }
        Rule::directive => {
            let mut inner = statement.into_inner();
            let name = inner.next().expect("directive has a name").as_str();
            let args = inner.next().map_or("", |args| args.as_str());
            Ok(ParsedLine {
                kind: LineKind::Directive {
                    name: name.to_string(),
                    args: args.trim().to_string(),
                },
                line,
            })
        }
        Rule::step => parse_step(statement, line),
        _ => Err(unexpected(&statement)),
    }
}

/// Parses a full zkASM source into its ordered list of lines.
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn parse_program(input: &str) -> Result<Vec<ParsedLine>, ParseError> {
    let program = ZkasmParser::parse(Rule::program, input)
        .map_err(Box::new)?
        .next()
        .expect("program rule always yields one pair");

    let mut lines = Vec::new();
    for pair in program.into_inner() {
        match pair.as_rule() {
            Rule::line => lines.push(parse_line(pair)?),
            Rule::EOI => (),
            _ => return Err(unexpected(&pair)),
        }
    }

    Ok(lines)
}
