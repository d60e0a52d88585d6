use std::fmt::Display;

/// Comparison operator carried by `ICMP`/`FCMP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CmpOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            CmpOp::Equal => "==",
            CmpOp::NotEqual => "!=",
            CmpOp::LessThan => "<",
            CmpOp::LessOrEqual => "<=",
            CmpOp::GreaterThan => ">",
            CmpOp::GreaterOrEqual => ">=",
        };
        f.write_str(op)
    }
}

/// One instruction of the stack machine: an opcode plus its immediate
/// operands. Integer instructions work the integer stack, their `F` prefixed
/// counterparts the float stack; booleans and characters ride the integer
/// stack as 0/1 and code points.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Instruction {
    // integer stack
    IPush(i64),
    IPop,
    IAdd,
    ISub,
    IMul,
    IDiv,
    And,
    Or,
    Xor,
    ICmp(CmpOp),
    IToF,
    // float stack; FCmp deposits its result on the integer stack
    FPush(f64),
    FPop,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FCmp(CmpOp),
    FToI,
    // memory
    ILoadGlobal(u32),
    IStoreGlobal(u32),
    FLoadGlobal(u32),
    FStoreGlobal(u32),
    ILoadLocal(u32),
    IStoreLocal(u32),
    FLoadLocal(u32),
    FStoreLocal(u32),
    // control
    Label(String),
    Goto(String),
    Bz(String),
    Call(String),
    Ret,
    Halt,
    // output
    IPrint,
    FPrint,
    BPrint,
    CPrint,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::IPush(value) => write!(f, "    IPUSH {value}"),
            Instruction::IPop => write!(f, "    IPOP"),
            Instruction::IAdd => write!(f, "    IADD"),
            Instruction::ISub => write!(f, "    ISUB"),
            Instruction::IMul => write!(f, "    IMUL"),
            Instruction::IDiv => write!(f, "    IDIV"),
            Instruction::And => write!(f, "    AND"),
            Instruction::Or => write!(f, "    OR"),
            Instruction::Xor => write!(f, "    XOR"),
            Instruction::ICmp(op) => write!(f, "    ICMP {op}"),
            Instruction::IToF => write!(f, "    ITOF"),
            Instruction::FPush(value) => write!(f, "    FPUSH {value}"),
            Instruction::FPop => write!(f, "    FPOP"),
            Instruction::FAdd => write!(f, "    FADD"),
            Instruction::FSub => write!(f, "    FSUB"),
            Instruction::FMul => write!(f, "    FMUL"),
            Instruction::FDiv => write!(f, "    FDIV"),
            Instruction::FCmp(op) => write!(f, "    FCMP {op}"),
            Instruction::FToI => write!(f, "    FTOI"),
            Instruction::ILoadGlobal(slot) => write!(f, "    ILOAD_GLOBAL {slot}"),
            Instruction::IStoreGlobal(slot) => write!(f, "    ISTORE_GLOBAL {slot}"),
            Instruction::FLoadGlobal(slot) => write!(f, "    FLOAD_GLOBAL {slot}"),
            Instruction::FStoreGlobal(slot) => write!(f, "    FSTORE_GLOBAL {slot}"),
            Instruction::ILoadLocal(slot) => write!(f, "    ILOAD_LOCAL {slot}"),
            Instruction::IStoreLocal(slot) => write!(f, "    ISTORE_LOCAL {slot}"),
            Instruction::FLoadLocal(slot) => write!(f, "    FLOAD_LOCAL {slot}"),
            Instruction::FStoreLocal(slot) => write!(f, "    FSTORE_LOCAL {slot}"),
            Instruction::Label(name) => write!(f, "{name}:"),
            Instruction::Goto(name) => write!(f, "    GOTO {name}"),
            Instruction::Bz(name) => write!(f, "    BZ {name}"),
            Instruction::Call(name) => write!(f, "    CALL {name}"),
            Instruction::Ret => write!(f, "    RET"),
            Instruction::Halt => write!(f, "    HALT"),
            Instruction::IPrint => write!(f, "    IPRINT"),
            Instruction::FPrint => write!(f, "    FPRINT"),
            Instruction::BPrint => write!(f, "    BPRINT"),
            Instruction::CPrint => write!(f, "    CPRINT"),
        }
    }
}
