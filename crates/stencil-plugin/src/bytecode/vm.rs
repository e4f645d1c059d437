//! Stack machine for emitted chunks
//!
//! Small and strict: it exists so lowered expressions can be executed and
//! compared across specialization paths, not to be fast.

use std::cmp::Ordering;

use stencil_runtime::{RuntimeError, RuntimeInstances, Slot, Value};
use thiserror::Error;

use crate::bytecode::emit::{emit, Chunk, Instr};
use crate::bytecode::expr::Expr;
use crate::error::LowerError;

/// Execution errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum VmError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("Stack underflow at instruction {pc}")]
    StackUnderflow { pc: usize },

    #[error("Missing call-site argument {index}")]
    MissingArgument { index: u16 },

    #[error("Local {index} read before it was stored")]
    UninitializedLocal { index: u16 },

    #[error("Malformed chunk: {message}")]
    Malformed { message: String },
}

pub type VmResult<T> = Result<T, VmError>;

/// Executes chunks against a set of runtime objects
pub struct Vm<'a> {
    instances: &'a RuntimeInstances,
}

impl<'a> Vm<'a> {
    pub fn new(instances: &'a RuntimeInstances) -> Self {
        Self { instances }
    }

    /// Emit and run an expression in one step
    pub fn evaluate(&self, expr: &Expr, args: &[Slot]) -> VmResult<Slot> {
        let chunk = emit(expr)?;
        self.run(&chunk, args)
    }

    /// Run `chunk` with the given call-site arguments
    pub fn run(&self, chunk: &Chunk, args: &[Slot]) -> VmResult<Slot> {
        let mut stack: Vec<Slot> = Vec::new();
        let mut locals: Vec<Option<Slot>> = vec![None; chunk.max_locals as usize];
        let mut pc = 0;

        while pc < chunk.code.len() {
            let instr = chunk.code[pc];
            pc += 1;
            match instr {
                Instr::Const(index) => {
                    let slot = chunk.constants.get(index as usize).ok_or_else(|| {
                        malformed(format!("constant #{} out of range", index))
                    })?;
                    stack.push(slot.clone());
                }
                Instr::LoadArg(index) => {
                    let slot = args
                        .get(index as usize)
                        .ok_or(VmError::MissingArgument { index })?;
                    stack.push(slot.clone());
                }
                Instr::LoadLocal(index) => {
                    let slot = locals
                        .get(index as usize)
                        .and_then(Option::as_ref)
                        .ok_or(VmError::UninitializedLocal { index })?;
                    stack.push(slot.clone());
                }
                Instr::StoreLocal(index) => {
                    let value = pop(&mut stack, pc)?;
                    let local = locals.get_mut(index as usize).ok_or_else(|| {
                        malformed(format!("local {} beyond max_locals", index))
                    })?;
                    *local = Some(value);
                }
                Instr::Invoke { method, argc } => {
                    let method = chunk.methods.get(method as usize).ok_or_else(|| {
                        malformed(format!("method #{} out of range", method))
                    })?;
                    let argc = argc as usize;
                    if stack.len() < argc {
                        return Err(VmError::StackUnderflow { pc: pc - 1 });
                    }
                    let call_args = stack.split_off(stack.len() - argc);
                    let receiver = if method.is_instance() {
                        self.instances.get(method.owner())
                    } else {
                        None
                    };
                    stack.push(method.routine().invoke(receiver, &call_args)?);
                }
                Instr::Convert(to) => {
                    let value = pop(&mut stack, pc)?;
                    stack.push(value.convert(to)?);
                }
                Instr::Box => {
                    let value = pop(&mut stack, pc)?;
                    stack.push(value.boxed());
                }
                Instr::Unbox(to) => {
                    let value = pop(&mut stack, pc)?;
                    stack.push(value.unbox(to)?);
                }
                Instr::NewList(n) => {
                    let n = n as usize;
                    if stack.len() < n {
                        return Err(VmError::StackUnderflow { pc: pc - 1 });
                    }
                    let items = stack
                        .split_off(stack.len() - n)
                        .into_iter()
                        .map(Slot::into_value)
                        .collect();
                    stack.push(Slot::Boxed(Value::List(items)));
                }
                Instr::Jump(target) => pc = target as usize,
                Instr::JumpIfFalse(target) => {
                    if !pop(&mut stack, pc)?.as_bool()? {
                        pc = target as usize;
                    }
                }
                Instr::Compare(op) => {
                    let rhs = pop(&mut stack, pc)?;
                    let lhs = pop(&mut stack, pc)?;
                    let ordering = match (&lhs, &rhs) {
                        (Slot::Int64(a), Slot::Int64(b)) => Some(a.cmp(b)),
                        (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
                    };
                    stack.push(Slot::Bool(op.holds(ordering)));
                }
                Instr::IsNull => {
                    let value = pop(&mut stack, pc)?;
                    let is_null = value.as_value().map_or(false, Value::is_nullish);
                    stack.push(Slot::Bool(is_null));
                }
                Instr::Not => {
                    let value = pop(&mut stack, pc)?.as_bool()?;
                    stack.push(Slot::Bool(!value));
                }
            }
        }

        let result = pop(&mut stack, pc)?;
        if !stack.is_empty() {
            return Err(malformed(format!("{} value(s) left on the stack", stack.len())));
        }
        Ok(result)
    }
}

fn pop(stack: &mut Vec<Slot>, pc: usize) -> VmResult<Slot> {
    stack.pop().ok_or(VmError::StackUnderflow {
        pc: pc.saturating_sub(1),
    })
}

fn malformed(message: String) -> VmError {
    VmError::Malformed { message }
}
