//! Lowering of assignment operands into step fragments.

use super::{
    error::CompileErrorKind,
    step::{FreeIn, StepFragment},
};
use crate::parser::{Op, Operand, Register};

/// Characters stripped from a free-input tag to obtain the function name.
const TAG_BRACKETS: &[char] = &['[', ']', '(', ')', '{', '}'];

fn free_input_name(tag: &str) -> String {
    tag.chars()
        .filter(|c| !TAG_BRACKETS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowers the input side of an assignment.
///
/// `step_index` is the index of the step being compiled: reading `zkPC`
/// yields it as a constant.
pub fn lower_input(input: &Operand, step_index: usize) -> Result<StepFragment, CompileErrorKind> {
    let mut fragment = StepFragment::default();
    match input {
        Operand::Tag(tag) => {
            fragment.free_in = Some(match tag {
                Some(tag) => FreeIn::FunctionCall {
                    func_name: free_input_name(tag),
                },
                None => FreeIn::Empty,
            });
            fragment.in_free = Some(1);
        }
        Operand::Reg(Register::ZkPc) => fragment.constant = Some(step_index as i128),
        Operand::Reg(Register::A) => fragment.in_a = Some(1),
        Operand::Reg(Register::B) => fragment.in_b = Some(1),
        Operand::Const(value) => fragment.constant = Some(*value),
        Operand::ConstL(value) => fragment.constant_l = Some(*value),
        Operand::Neg(inner) => {
            fragment = lower_input(inner, step_index)?;
            fragment.negate();
        }
        Operand::Binary { .. } => {
            return Err(CompileErrorKind::InvalidOperand(format!(
                "unsupported {} `{}`",
                input.kind(),
                input
            )));
        }
    }
    Ok(fragment)
}

/// Lowers the destination registers of an assignment.
pub fn lower_outputs(outputs: &[Register]) -> Result<StepFragment, CompileErrorKind> {
    let mut fragment = StepFragment::default();
    for &reg in outputs {
        let slot = match reg {
            Register::A => &mut fragment.set_a,
            Register::B => &mut fragment.set_b,
            Register::ZkPc => {
                return Err(CompileErrorKind::InvalidOperand(
                    "zkPC cannot be an assignment target".to_string(),
                ));
            }
        };
        if slot.is_some() {
            return Err(CompileErrorKind::DuplicateOutputRegister(reg));
        }
        *slot = Some(1);
    }
    Ok(fragment)
}

/// Lowers an explicit operation flag.
pub fn lower_op(op: &Op) -> StepFragment {
    match op {
        Op::Add => StepFragment {
            add: true,
            ..Default::default()
        },
        Op::Jmp(target) => StepFragment {
            jmp: true,
            offset: Some(target.clone()),
            ..Default::default()
        },
        Op::Jmpz(target) => StepFragment {
            jmpz: true,
            offset: Some(target.clone()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BinaryOp, JumpTarget};

    #[test]
    fn test_tag_brackets_are_stripped() {
        let fragment = lower_input(&Operand::Tag(Some(" getAFreeInput() ".into())), 0).unwrap();
        assert_eq!(
            fragment.free_in,
            Some(FreeIn::FunctionCall {
                func_name: "getAFreeInput".into()
            })
        );
        assert_eq!(fragment.in_free, Some(1));

        let fragment = lower_input(&Operand::Tag(None), 0).unwrap();
        assert_eq!(fragment.free_in, Some(FreeIn::Empty));
        assert_eq!(fragment.in_free, Some(1));
    }

    #[test]
    fn test_zkpc_reads_current_step_index() {
        let fragment = lower_input(&Operand::Reg(Register::ZkPc), 12).unwrap();
        assert_eq!(fragment.constant, Some(12));
        assert_eq!(fragment.in_a, None);

        let negated = Operand::Neg(Box::new(Operand::Reg(Register::ZkPc)));
        assert_eq!(lower_input(&negated, 12).unwrap().constant, Some(-12));
    }

    #[test]
    fn test_registers_and_constants() {
        assert_eq!(lower_input(&Operand::Reg(Register::A), 0).unwrap().in_a, Some(1));
        assert_eq!(lower_input(&Operand::Reg(Register::B), 0).unwrap().in_b, Some(1));
        assert_eq!(lower_input(&Operand::Const(42), 0).unwrap().constant, Some(42));

        let long = lower_input(&Operand::ConstL(1 << 40), 0).unwrap();
        assert_eq!(long.constant_l, Some(1 << 40));
        assert_eq!(long.constant, None);
    }

    #[test]
    fn test_negation_negates_flags() {
        let fragment = lower_input(&Operand::Neg(Box::new(Operand::Reg(Register::A))), 0).unwrap();
        assert_eq!(fragment.in_a, Some(-1));

        let double = Operand::Neg(Box::new(Operand::Neg(Box::new(Operand::Const(3)))));
        assert_eq!(lower_input(&double, 0).unwrap().constant, Some(3));
    }

    #[test]
    fn test_binary_expression_is_rejected() {
        let input = Operand::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(Operand::Reg(Register::A)),
            rhs: Box::new(Operand::Reg(Register::B)),
        };
        let err = lower_input(&input, 0).unwrap_err();
        assert!(matches!(err, CompileErrorKind::InvalidOperand(msg) if msg.contains("addition")));
    }

    #[test]
    fn test_outputs() {
        let fragment = lower_outputs(&[Register::A, Register::B]).unwrap();
        assert_eq!(fragment.set_a, Some(1));
        assert_eq!(fragment.set_b, Some(1));

        assert_eq!(
            lower_outputs(&[Register::B, Register::A, Register::B]).unwrap_err(),
            CompileErrorKind::DuplicateOutputRegister(Register::B)
        );
        assert!(matches!(
            lower_outputs(&[Register::ZkPc]).unwrap_err(),
            CompileErrorKind::InvalidOperand(_)
        ));
    }

    #[test]
    fn test_jump_ops_carry_their_target() {
        let fragment = lower_op(&Op::Jmpz(JumpTarget::Label("end".into())));
        assert!(fragment.jmpz);
        assert!(!fragment.jmp);
        assert_eq!(fragment.offset, Some(JumpTarget::Label("end".into())));
    }
}
