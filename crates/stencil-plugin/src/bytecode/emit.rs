//! Bytecode emission
//!
//! Linearizes an [`Expr`] tree into stack instructions. Jump targets are
//! absolute instruction indices.

use std::fmt;

use stencil_runtime::{Repr, Slot};

use crate::bytecode::expr::{CmpOp, Expr};
use crate::error::{LowerError, LowerResult};
use crate::method_ref::MethodRef;

/// A stack machine instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instr {
    /// Push constant from the pool
    Const(u32),
    /// Push call-site argument
    LoadArg(u16),
    /// Push local
    LoadLocal(u16),
    /// Pop into local
    StoreLocal(u16),
    /// Pop `argc` arguments, call method from the pool, push its result
    Invoke { method: u32, argc: u16 },
    /// Native numeric conversion of the top of stack
    Convert(Repr),
    /// Box the top of stack
    Box,
    /// Unbox the top of stack
    Unbox(Repr),
    /// Pop `n` boxed values into a boxed list
    NewList(u16),
    /// Unconditional jump
    Jump(u32),
    /// Pop a bool and jump if it is false
    JumpIfFalse(u32),
    /// Pop rhs, pop lhs, push the comparison
    Compare(CmpOp),
    /// Pop a value, push whether it is null or undefined
    IsNull,
    /// Pop a bool, push its negation
    Not,
}

/// An emitted expression, ready for the VM
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub code: Vec<Instr>,
    pub constants: Vec<Slot>,
    pub methods: Vec<MethodRef>,
    pub max_locals: u16,
    pub result_repr: Repr,
}

/// Emit `expr` into a fresh chunk
pub fn emit(expr: &Expr) -> LowerResult<Chunk> {
    let mut emitter = Emitter::default();
    emitter.emit(expr)?;
    tracing::trace!(instructions = emitter.code.len(), "emitted chunk");
    Ok(Chunk {
        code: emitter.code,
        constants: emitter.constants,
        methods: emitter.methods,
        max_locals: emitter.max_locals,
        result_repr: expr.repr(),
    })
}

#[derive(Default)]
struct Emitter {
    code: Vec<Instr>,
    constants: Vec<Slot>,
    methods: Vec<MethodRef>,
    max_locals: u16,
}

impl Emitter {
    fn emit(&mut self, expr: &Expr) -> LowerResult<()> {
        match expr {
            Expr::Const(slot) => {
                let index = self.constant(slot)?;
                self.code.push(Instr::Const(index));
            }
            Expr::Arg { index, .. } => self.code.push(Instr::LoadArg(*index)),
            Expr::Local { index, .. } => self.code.push(Instr::LoadLocal(*index)),
            Expr::Invoke { method, args } => {
                for arg in args {
                    self.emit(arg)?;
                }
                let argc = u16::try_from(args.len())
                    .map_err(|_| LowerError::internal("too many call arguments"))?;
                let method = self.method(method)?;
                self.code.push(Instr::Invoke { method, argc });
            }
            Expr::Convert { value, to } => {
                self.emit(value)?;
                self.code.push(Instr::Convert(*to));
            }
            Expr::BoxValue(value) => {
                self.emit(value)?;
                self.code.push(Instr::Box);
            }
            Expr::Unbox { value, to } => {
                self.emit(value)?;
                self.code.push(Instr::Unbox(*to));
            }
            Expr::NewList(items) => {
                for item in items {
                    self.emit(item)?;
                }
                let n = u16::try_from(items.len())
                    .map_err(|_| LowerError::internal("list literal too long"))?;
                self.code.push(Instr::NewList(n));
            }
            Expr::Let { index, value, body } => {
                self.emit(value)?;
                self.code.push(Instr::StoreLocal(*index));
                self.max_locals = self.max_locals.max(index.saturating_add(1));
                self.emit(body)?;
            }
            Expr::Select {
                cond,
                then,
                otherwise,
            } => {
                if then.repr() != otherwise.repr() {
                    return Err(LowerError::internal(format!(
                        "select branches disagree: {} vs {}",
                        then.repr(),
                        otherwise.repr()
                    )));
                }
                self.emit(cond)?;
                let to_else = self.placeholder();
                self.emit(then)?;
                let to_end = self.placeholder();
                let else_start = self.here()?;
                self.patch(to_else, Instr::JumpIfFalse(else_start));
                self.emit(otherwise)?;
                let end = self.here()?;
                self.patch(to_end, Instr::Jump(end));
            }
            Expr::Compare { op, lhs, rhs } => {
                self.emit(lhs)?;
                self.emit(rhs)?;
                self.code.push(Instr::Compare(*op));
            }
            Expr::IsNull(value) => {
                self.emit(value)?;
                self.code.push(Instr::IsNull);
            }
            Expr::Not(value) => {
                self.emit(value)?;
                self.code.push(Instr::Not);
            }
        }
        Ok(())
    }

    fn constant(&mut self, slot: &Slot) -> LowerResult<u32> {
        let index = match self.constants.iter().position(|c| c == slot) {
            Some(index) => index,
            None => {
                self.constants.push(slot.clone());
                self.constants.len() - 1
            }
        };
        u32::try_from(index).map_err(|_| LowerError::internal("constant pool overflow"))
    }

    fn method(&mut self, method: &MethodRef) -> LowerResult<u32> {
        let index = match self.methods.iter().position(|m| m == method) {
            Some(index) => index,
            None => {
                self.methods.push(method.clone());
                self.methods.len() - 1
            }
        };
        u32::try_from(index).map_err(|_| LowerError::internal("method pool overflow"))
    }

    fn placeholder(&mut self) -> usize {
        self.code.push(Instr::Jump(u32::MAX));
        self.code.len() - 1
    }

    fn patch(&mut self, at: usize, instr: Instr) {
        self.code[at] = instr;
    }

    fn here(&self) -> LowerResult<u32> {
        u32::try_from(self.code.len()).map_err(|_| LowerError::internal("chunk too large"))
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "; chunk -> {} (locals: {})",
            self.result_repr, self.max_locals
        )?;
        for (pc, instr) in self.code.iter().enumerate() {
            write!(f, "{:04}  ", pc)?;
            match instr {
                Instr::Const(i) => match self.constants.get(*i as usize) {
                    Some(slot) => writeln!(f, "const {:?}", slot)?,
                    None => writeln!(f, "const #{}", i)?,
                },
                Instr::Invoke { method, argc } => match self.methods.get(*method as usize) {
                    Some(m) => writeln!(f, "invoke {} ({} args)", m, argc)?,
                    None => writeln!(f, "invoke #{} ({} args)", method, argc)?,
                },
                other => writeln!(f, "{:?}", other)?,
            }
        }
        Ok(())
    }
}
