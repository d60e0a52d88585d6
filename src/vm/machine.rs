use std::{
    collections::HashMap,
    error::Error,
    fmt::Display,
    io::{self, Write},
};

use crate::interpreter::floor_div;

use super::instruction::{CmpOp, Instruction};

/// A value held in a storage slot. Slots are typed by the instruction that
/// accesses them; a mismatch is a fatal machine error.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Word {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MachineError {
    StackUnderflow { stack: &'static str },
    UndefinedLabel { name: String },
    UninitializedSlot { scope: &'static str, slot: u32 },
    SlotType { scope: &'static str, slot: u32, expected: &'static str },
    NoActiveFrame,
    CallStackUnderflow,
    DivisionByZero,
    BadCharacter { value: i64 },
    Io { message: String },
}

impl Display for MachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineError::StackUnderflow { stack } => {
                write!(f, "{stack} stack underflow")
            }
            MachineError::UndefinedLabel { name } => write!(f, "undefined label '{name}'"),
            MachineError::UninitializedSlot { scope, slot } => {
                write!(f, "{scope} slot {slot} read before being written")
            }
            MachineError::SlotType {
                scope,
                slot,
                expected,
            } => write!(f, "{scope} slot {slot} does not hold {expected}"),
            MachineError::NoActiveFrame => write!(f, "local access outside of a call frame"),
            MachineError::CallStackUnderflow => write!(f, "RET without a matching CALL"),
            MachineError::DivisionByZero => write!(f, "integer division by zero"),
            MachineError::BadCharacter { value } => {
                write!(f, "{value} is not a printable character")
            }
            MachineError::Io { message } => write!(f, "output failed: {message}"),
        }
    }
}

impl Error for MachineError {}

/// One activation record: where to continue after `RET`, and the local slots.
#[derive(Debug, Default)]
struct Frame {
    return_address: usize,
    locals: HashMap<u32, Word>,
}

/// The stack virtual machine: two typed operand stacks, indexed global
/// storage, a frame stack for locals, and a label map built in one linear
/// scan. Runs until `HALT` or until the program counter walks off the end.
pub struct Machine<W> {
    pc: usize,
    running: bool,
    istack: Vec<i64>,
    fstack: Vec<f64>,
    globals: HashMap<u32, Word>,
    frames: Vec<Frame>,
    labels: HashMap<String, usize>,
    out: W,
}

impl Machine<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Machine<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Machine<W>
where
    W: Write,
{
    pub fn with_output(out: W) -> Self {
        Self {
            pc: 0,
            running: false,
            istack: vec![],
            fstack: vec![],
            globals: HashMap::new(),
            frames: vec![],
            labels: HashMap::new(),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, code: &[Instruction]) -> Result<(), MachineError> {
        self.labels = code
            .iter()
            .enumerate()
            .filter_map(|(index, instruction)| match instruction {
                Instruction::Label(name) => Some((name.clone(), index)),
                _ => None,
            })
            .collect();

        self.pc = 0;
        self.running = true;

        while self.running && self.pc < code.len() {
            let instruction = &code[self.pc];
            self.pc += 1;
            self.step(instruction)?;
        }

        Ok(())
    }

    fn step(&mut self, instruction: &Instruction) -> Result<(), MachineError> {
        match instruction {
            Instruction::IPush(value) => self.istack.push(*value),
            Instruction::IPop => {
                self.ipop()?;
            }
            Instruction::IAdd => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left.wrapping_add(right));
            }
            Instruction::ISub => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left.wrapping_sub(right));
            }
            Instruction::IMul => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left.wrapping_mul(right));
            }
            Instruction::IDiv => {
                let (left, right) = self.ipop2()?;
                if right == 0 {
                    return Err(MachineError::DivisionByZero);
                }
                self.istack.push(floor_div(left, right));
            }
            Instruction::And => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left & right);
            }
            Instruction::Or => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left | right);
            }
            Instruction::Xor => {
                let (left, right) = self.ipop2()?;
                self.istack.push(left ^ right);
            }
            Instruction::ICmp(op) => {
                let (left, right) = self.ipop2()?;
                self.istack.push(compare(*op, &left, &right));
            }
            Instruction::IToF => {
                let value = self.ipop()?;
                self.fstack.push(value as f64);
            }
            Instruction::FPush(value) => self.fstack.push(*value),
            Instruction::FPop => {
                self.fpop()?;
            }
            Instruction::FAdd => {
                let (left, right) = self.fpop2()?;
                self.fstack.push(left + right);
            }
            Instruction::FSub => {
                let (left, right) = self.fpop2()?;
                self.fstack.push(left - right);
            }
            Instruction::FMul => {
                let (left, right) = self.fpop2()?;
                self.fstack.push(left * right);
            }
            Instruction::FDiv => {
                let (left, right) = self.fpop2()?;
                self.fstack.push(left / right);
            }
            Instruction::FCmp(op) => {
                // comparison results always land on the integer stack
                let (left, right) = self.fpop2()?;
                self.istack.push(compare(*op, &left, &right));
            }
            Instruction::FToI => {
                let value = self.fpop()?;
                self.istack.push(value as i64);
            }
            Instruction::ILoadGlobal(slot) => {
                let value = self.load_global(*slot)?;
                let Word::Int(value) = value else {
                    return Err(MachineError::SlotType {
                        scope: "global",
                        slot: *slot,
                        expected: "an integer",
                    });
                };
                self.istack.push(value);
            }
            Instruction::FLoadGlobal(slot) => {
                let value = self.load_global(*slot)?;
                let Word::Float(value) = value else {
                    return Err(MachineError::SlotType {
                        scope: "global",
                        slot: *slot,
                        expected: "a float",
                    });
                };
                self.fstack.push(value);
            }
            Instruction::IStoreGlobal(slot) => {
                let value = self.ipop()?;
                self.globals.insert(*slot, Word::Int(value));
            }
            Instruction::FStoreGlobal(slot) => {
                let value = self.fpop()?;
                self.globals.insert(*slot, Word::Float(value));
            }
            Instruction::ILoadLocal(slot) => {
                let value = self.load_local(*slot)?;
                let Word::Int(value) = value else {
                    return Err(MachineError::SlotType {
                        scope: "local",
                        slot: *slot,
                        expected: "an integer",
                    });
                };
                self.istack.push(value);
            }
            Instruction::FLoadLocal(slot) => {
                let value = self.load_local(*slot)?;
                let Word::Float(value) = value else {
                    return Err(MachineError::SlotType {
                        scope: "local",
                        slot: *slot,
                        expected: "a float",
                    });
                };
                self.fstack.push(value);
            }
            Instruction::IStoreLocal(slot) => {
                let value = self.ipop()?;
                let frame = self.frames.last_mut().ok_or(MachineError::NoActiveFrame)?;
                frame.locals.insert(*slot, Word::Int(value));
            }
            Instruction::FStoreLocal(slot) => {
                let value = self.fpop()?;
                let frame = self.frames.last_mut().ok_or(MachineError::NoActiveFrame)?;
                frame.locals.insert(*slot, Word::Float(value));
            }
            Instruction::Label(_) => {}
            Instruction::Goto(name) => {
                self.pc = self.label(name)?;
            }
            Instruction::Bz(name) => {
                let target = self.label(name)?;
                if self.ipop()? == 0 {
                    self.pc = target;
                }
            }
            Instruction::Call(name) => {
                let target = self.label(name)?;
                self.frames.push(Frame {
                    return_address: self.pc,
                    locals: HashMap::new(),
                });
                self.pc = target;
            }
            Instruction::Ret => {
                let frame = self.frames.pop().ok_or(MachineError::CallStackUnderflow)?;
                self.pc = frame.return_address;
            }
            Instruction::Halt => {
                self.running = false;
            }
            Instruction::IPrint => {
                let value = self.ipop()?;
                self.write(format_args!("{value}\n"))?;
            }
            Instruction::FPrint => {
                let value = self.fpop()?;
                self.write(format_args!("{value}\n"))?;
            }
            Instruction::BPrint => {
                let value = self.ipop()?;
                let text = if value == 0 { "false" } else { "true" };
                self.write(format_args!("{text}\n"))?;
            }
            Instruction::CPrint => {
                let value = self.ipop()?;
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(MachineError::BadCharacter { value })?;
                self.write(format_args!("{c}"))?;
            }
        }

        Ok(())
    }

    fn ipop(&mut self) -> Result<i64, MachineError> {
        self.istack
            .pop()
            .ok_or(MachineError::StackUnderflow { stack: "integer" })
    }

    /// Pop right then left, returning them in evaluation order.
    fn ipop2(&mut self) -> Result<(i64, i64), MachineError> {
        let right = self.ipop()?;
        let left = self.ipop()?;
        Ok((left, right))
    }

    fn fpop(&mut self) -> Result<f64, MachineError> {
        self.fstack
            .pop()
            .ok_or(MachineError::StackUnderflow { stack: "float" })
    }

    fn fpop2(&mut self) -> Result<(f64, f64), MachineError> {
        let right = self.fpop()?;
        let left = self.fpop()?;
        Ok((left, right))
    }

    fn load_global(&self, slot: u32) -> Result<Word, MachineError> {
        self.globals
            .get(&slot)
            .copied()
            .ok_or(MachineError::UninitializedSlot {
                scope: "global",
                slot,
            })
    }

    fn load_local(&self, slot: u32) -> Result<Word, MachineError> {
        let frame = self.frames.last().ok_or(MachineError::NoActiveFrame)?;
        frame
            .locals
            .get(&slot)
            .copied()
            .ok_or(MachineError::UninitializedSlot {
                scope: "local",
                slot,
            })
    }

    fn label(&self, name: &str) -> Result<usize, MachineError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| MachineError::UndefinedLabel {
                name: name.to_string(),
            })
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), MachineError> {
        self.out.write_fmt(args).map_err(|e| MachineError::Io {
            message: e.to_string(),
        })
    }
}

fn compare<T: PartialOrd>(op: CmpOp, left: &T, right: &T) -> i64 {
    let result = match op {
        CmpOp::Equal => left == right,
        CmpOp::NotEqual => left != right,
        CmpOp::LessThan => left < right,
        CmpOp::LessOrEqual => left <= right,
        CmpOp::GreaterThan => left > right,
        CmpOp::GreaterOrEqual => left >= right,
    };
    i64::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    fn run_code(code: &[Instruction]) -> Result<String, MachineError> {
        let mut machine = Machine::with_output(Vec::new());
        machine.run(code)?;
        Ok(String::from_utf8(machine.into_output()).expect("output is valid utf-8"))
    }

    #[test]
    fn test_expression_evaluation() {
        // 2 + 3 * 4
        let code = vec![
            IPush(2),
            IPush(3),
            IPush(4),
            IMul,
            IAdd,
            IPrint,
            Halt,
        ];
        assert_eq!(run_code(&code).unwrap(), "14\n");
    }

    #[test]
    fn test_float_compare_lands_on_integer_stack() {
        let code = vec![FPush(1.5), FPush(2.5), FCmp(CmpOp::LessThan), BPrint];
        assert_eq!(run_code(&code).unwrap(), "true\n");
    }

    #[test]
    fn test_global_storage() {
        let code = vec![
            IPush(42),
            IStoreGlobal(0),
            ILoadGlobal(0),
            ILoadGlobal(0),
            IAdd,
            IPrint,
        ];
        assert_eq!(run_code(&code).unwrap(), "84\n");
    }

    #[test]
    fn test_branching() {
        let code = vec![
            IPush(0),
            Bz("skip".into()),
            IPush(1),
            IPrint,
            Label("skip".into()),
            IPush(2),
            IPrint,
        ];
        assert_eq!(run_code(&code).unwrap(), "2\n");
    }

    #[test]
    fn test_call_and_ret() {
        // square(7) via a local slot
        let code = vec![
            IPush(7),
            Call("square".into()),
            IPrint,
            Halt,
            Label("square".into()),
            IStoreLocal(0),
            ILoadLocal(0),
            ILoadLocal(0),
            IMul,
            Ret,
        ];
        assert_eq!(run_code(&code).unwrap(), "49\n");
    }

    #[test]
    fn test_calls_do_not_share_locals() {
        let code = vec![
            IPush(1),
            Call("f".into()),
            Halt,
            Label("f".into()),
            IStoreLocal(0),
            ILoadLocal(0),
            Bz("done".into()),
            IPush(0),
            Call("f".into()),
            Label("done".into()),
            ILoadLocal(0),
            IPrint,
            Ret,
        ];
        assert_eq!(run_code(&code).unwrap(), "0\n1\n");
    }

    #[test]
    fn test_division_by_zero() {
        let code = vec![IPush(1), IPush(0), IDiv];
        assert_eq!(run_code(&code), Err(MachineError::DivisionByZero));
    }

    #[test]
    fn test_stack_underflow_is_an_error() {
        assert_eq!(
            run_code(&[IAdd]),
            Err(MachineError::StackUnderflow { stack: "integer" })
        );
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        assert_eq!(
            run_code(&[Goto("nowhere".into())]),
            Err(MachineError::UndefinedLabel {
                name: "nowhere".into()
            })
        );
    }

    #[test]
    fn test_typed_slots() {
        let code = vec![FPush(1.0), FStoreGlobal(0), ILoadGlobal(0)];
        assert!(matches!(
            run_code(&code),
            Err(MachineError::SlotType { .. })
        ));
    }

    #[test]
    fn test_pc_off_the_end_halts() {
        assert_eq!(run_code(&[IPush(1), IPrint]).unwrap(), "1\n");
    }

    #[test]
    fn test_char_print_has_no_newline() {
        let code = vec![IPush('h' as i64), CPrint, IPush('i' as i64), CPrint];
        assert_eq!(run_code(&code).unwrap(), "hi");
    }

    #[test]
    fn test_itof_and_ftoi() {
        let code = vec![IPush(3), IToF, FPush(0.5), FAdd, FPrint, FPush(2.9), FToI, IPrint];
        assert_eq!(run_code(&code).unwrap(), "3.5\n2\n");
    }
}
