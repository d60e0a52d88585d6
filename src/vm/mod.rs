//! The stack virtual machine and its code generator.
//!
//! [`generate`] lowers a type-checked program to the instruction set in
//! [`Instruction`]; [`Machine`] executes that stream against two typed
//! operand stacks, indexed global storage and a frame stack for locals.

mod codegen;
mod instruction;
mod machine;

pub use codegen::*;
pub use instruction::*;
pub use machine::*;
