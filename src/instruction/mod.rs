use std::fmt;

pub mod decoder;
pub mod processor;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// [Opcode forms](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html#three)
pub enum OpcodeForm {
    Short,
    Long,
    Var,
    Ext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// [Operand types](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html#two)
pub enum OperandType {
    LargeConstant,
    SmallConstant,
    Variable,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// [Operands](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html#five)
pub struct Operand {
    /// The [OperandType]
    operand_type: OperandType,
    /// Operand value
    value: u16,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.operand_type {
            OperandType::LargeConstant => write!(f, "#{:04x}", self.value),
            OperandType::SmallConstant => write!(f, "#{:02x}", self.value as u8),
            OperandType::Variable => {
                if self.value == 0 {
                    write!(f, "(SP)+")
                } else if self.value < 16 {
                    write!(f, "L{:02x}", self.value - 1)
                } else {
                    write!(f, "G{:02x}", self.value - 16)
                }
            }
        }
    }
}

impl Operand {
    /// Constructor
    ///
    /// # Arguments
    /// * `operand_type` - [OperandType]
    /// * `value` - Operand value
    pub fn new(operand_type: OperandType, value: u16) -> Operand {
        Operand {
            operand_type,
            value,
        }
    }

    pub fn operand_type(&self) -> OperandType {
        self.operand_type
    }

    pub fn value(&self) -> u16 {
        self.value
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// Branching information
pub struct Branch {
    /// Address of the (first) branch descriptor byte
    address: usize,
    /// Branch-on condition
    condition: bool,
    /// Address of the branch destination, 0 to return false, or 1 to return true
    branch_address: usize,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] ", self.condition)?;
        match self.branch_address {
            0 => write!(f, "RFALSE"),
            1 => write!(f, "RTRUE"),
            _ => write!(f, "${:05x}", self.branch_address),
        }
    }
}

impl Branch {
    /// Constructor
    ///
    /// # Arguments
    /// * `address` - address of the (first) branch descriptor byte
    /// * `condition` - branch-on condition
    /// * `branch_address` - branch destination address
    pub fn new(address: usize, condition: bool, branch_address: usize) -> Branch {
        Branch {
            address,
            condition,
            branch_address,
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn branch_address(&self) -> usize {
        self.branch_address
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// Where the result of an instruction will be stored
pub struct StoreResult {
    /// Address of the store result descriptor byte
    address: usize,
    /// Variable to store to
    variable: u8,
}

impl fmt::Display for StoreResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.variable == 0 {
            write!(f, "-(SP)")
        } else if self.variable < 16 {
            write!(f, "L{:02x}", self.variable - 1)
        } else {
            write!(f, "G{:02x}", self.variable - 16)
        }
    }
}

impl StoreResult {
    /// Constructor
    ///
    /// # Arguments
    /// * `address` - Address of the store descriptor byte
    /// * `variable` - Variable to store to
    pub fn new(address: usize, variable: u8) -> StoreResult {
        StoreResult { address, variable }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn variable(&self) -> u8 {
        self.variable
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// [Operand count](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html#five)
pub enum OperandCount {
    _0OP,
    _1OP,
    _2OP,
    _VAR,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
/// Every operation the machine executes, after version-dependent opcode numbers are resolved
pub enum Operation {
    // 0OP
    Rtrue,
    Rfalse,
    Print,
    PrintRet,
    Nop,
    Save,
    Restore,
    Restart,
    RetPopped,
    Pop,
    Catch,
    Quit,
    NewLine,
    ShowStatus,
    Verify,
    Piracy,
    // 1OP
    Jz,
    GetSibling,
    GetChild,
    GetParent,
    GetPropLen,
    Inc,
    Dec,
    PrintAddr,
    Call1S,
    RemoveObj,
    PrintObj,
    Ret,
    Jump,
    PrintPaddr,
    Load,
    Not,
    Call1N,
    // 2OP
    Je,
    Jl,
    Jg,
    DecChk,
    IncChk,
    Jin,
    Test,
    Or,
    And,
    TestAttr,
    SetAttr,
    ClearAttr,
    Store,
    InsertObj,
    Loadw,
    Loadb,
    GetProp,
    GetPropAddr,
    GetNextProp,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Call2S,
    Call2N,
    SetColour,
    Throw,
    // VAR
    Call,
    Storew,
    Storeb,
    PutProp,
    Sread,
    Aread,
    PrintChar,
    PrintNum,
    Random,
    Push,
    Pull,
    SplitWindow,
    SetWindow,
    CallVs2,
    EraseWindow,
    EraseLine,
    SetCursor,
    GetCursor,
    SetTextStyle,
    BufferMode,
    OutputStream,
    InputStream,
    SoundEffect,
    ReadChar,
    ScanTable,
    CallVn,
    CallVn2,
    Tokenise,
    EncodeText,
    CopyTable,
    PrintTable,
    CheckArgCount,
    // EXT
    LogShift,
    ArtShift,
    SetFont,
    SaveUndo,
    RestoreUndo,
    PrintUnicode,
    CheckUnicode,
    SetTrueColour,
    /// Opcode number with no meaning in this version
    Unknown,
}

impl Operation {
    /// Fewest operands the operation can execute with
    pub fn minimum_operands(&self) -> usize {
        match self {
            Operation::Jz
            | Operation::GetSibling
            | Operation::GetChild
            | Operation::GetParent
            | Operation::GetPropLen
            | Operation::Inc
            | Operation::Dec
            | Operation::PrintAddr
            | Operation::Call1S
            | Operation::RemoveObj
            | Operation::PrintObj
            | Operation::Ret
            | Operation::Jump
            | Operation::PrintPaddr
            | Operation::Load
            | Operation::Not
            | Operation::Call1N
            | Operation::Call
            | Operation::CallVs2
            | Operation::CallVn
            | Operation::CallVn2
            | Operation::Sread
            | Operation::Aread
            | Operation::PrintChar
            | Operation::PrintNum
            | Operation::Random
            | Operation::Push
            | Operation::Pull
            | Operation::CheckArgCount
            | Operation::SetFont
            | Operation::PrintUnicode
            | Operation::CheckUnicode => 1,
            Operation::Je
            | Operation::Jl
            | Operation::Jg
            | Operation::DecChk
            | Operation::IncChk
            | Operation::Jin
            | Operation::Test
            | Operation::Or
            | Operation::And
            | Operation::TestAttr
            | Operation::SetAttr
            | Operation::ClearAttr
            | Operation::Store
            | Operation::InsertObj
            | Operation::Loadw
            | Operation::Loadb
            | Operation::GetProp
            | Operation::GetPropAddr
            | Operation::GetNextProp
            | Operation::Add
            | Operation::Sub
            | Operation::Mul
            | Operation::Div
            | Operation::Mod
            | Operation::Call2S
            | Operation::Call2N
            | Operation::SetColour
            | Operation::Throw
            | Operation::Tokenise
            | Operation::PrintTable
            | Operation::LogShift
            | Operation::ArtShift
            | Operation::SetTrueColour => 2,
            Operation::Storew
            | Operation::Storeb
            | Operation::PutProp
            | Operation::ScanTable
            | Operation::CopyTable => 3,
            Operation::EncodeText => 4,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Rtrue => "RTRUE",
            Operation::Rfalse => "RFALSE",
            Operation::Print => "PRINT",
            Operation::PrintRet => "PRINT_RET",
            Operation::Nop => "NOP",
            Operation::Save => "SAVE",
            Operation::Restore => "RESTORE",
            Operation::Restart => "RESTART",
            Operation::RetPopped => "RET_POPPED",
            Operation::Pop => "POP",
            Operation::Catch => "CATCH",
            Operation::Quit => "QUIT",
            Operation::NewLine => "NEW_LINE",
            Operation::ShowStatus => "SHOW_STATUS",
            Operation::Verify => "VERIFY",
            Operation::Piracy => "PIRACY",
            Operation::Jz => "JZ",
            Operation::GetSibling => "GET_SIBLING",
            Operation::GetChild => "GET_CHILD",
            Operation::GetParent => "GET_PARENT",
            Operation::GetPropLen => "GET_PROP_LEN",
            Operation::Inc => "INC",
            Operation::Dec => "DEC",
            Operation::PrintAddr => "PRINT_ADDR",
            Operation::Call1S => "CALL_1S",
            Operation::RemoveObj => "REMOVE_OBJ",
            Operation::PrintObj => "PRINT_OBJ",
            Operation::Ret => "RET",
            Operation::Jump => "JUMP",
            Operation::PrintPaddr => "PRINT_PADDR",
            Operation::Load => "LOAD",
            Operation::Not => "NOT",
            Operation::Call1N => "CALL_1N",
            Operation::Je => "JE",
            Operation::Jl => "JL",
            Operation::Jg => "JG",
            Operation::DecChk => "DEC_CHK",
            Operation::IncChk => "INC_CHK",
            Operation::Jin => "JIN",
            Operation::Test => "TEST",
            Operation::Or => "OR",
            Operation::And => "AND",
            Operation::TestAttr => "TEST_ATTR",
            Operation::SetAttr => "SET_ATTR",
            Operation::ClearAttr => "CLEAR_ATTR",
            Operation::Store => "STORE",
            Operation::InsertObj => "INSERT_OBJ",
            Operation::Loadw => "LOADW",
            Operation::Loadb => "LOADB",
            Operation::GetProp => "GET_PROP",
            Operation::GetPropAddr => "GET_PROP_ADDR",
            Operation::GetNextProp => "GET_NEXT_PROP",
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Mul => "MUL",
            Operation::Div => "DIV",
            Operation::Mod => "MOD",
            Operation::Call2S => "CALL_2S",
            Operation::Call2N => "CALL_2N",
            Operation::SetColour => "SET_COLOUR",
            Operation::Throw => "THROW",
            Operation::Call => "CALL",
            Operation::Storew => "STOREW",
            Operation::Storeb => "STOREB",
            Operation::PutProp => "PUT_PROP",
            Operation::Sread => "SREAD",
            Operation::Aread => "AREAD",
            Operation::PrintChar => "PRINT_CHAR",
            Operation::PrintNum => "PRINT_NUM",
            Operation::Random => "RANDOM",
            Operation::Push => "PUSH",
            Operation::Pull => "PULL",
            Operation::SplitWindow => "SPLIT_WINDOW",
            Operation::SetWindow => "SET_WINDOW",
            Operation::CallVs2 => "CALL_VS2",
            Operation::EraseWindow => "ERASE_WINDOW",
            Operation::EraseLine => "ERASE_LINE",
            Operation::SetCursor => "SET_CURSOR",
            Operation::GetCursor => "GET_CURSOR",
            Operation::SetTextStyle => "SET_TEXT_STYLE",
            Operation::BufferMode => "BUFFER_MODE",
            Operation::OutputStream => "OUTPUT_STREAM",
            Operation::InputStream => "INPUT_STREAM",
            Operation::SoundEffect => "SOUND_EFFECT",
            Operation::ReadChar => "READ_CHAR",
            Operation::ScanTable => "SCAN_TABLE",
            Operation::CallVn => "CALL_VN",
            Operation::CallVn2 => "CALL_VN2",
            Operation::Tokenise => "TOKENISE",
            Operation::EncodeText => "ENCODE_TEXT",
            Operation::CopyTable => "COPY_TABLE",
            Operation::PrintTable => "PRINT_TABLE",
            Operation::CheckArgCount => "CHECK_ARG_COUNT",
            Operation::LogShift => "LOG_SHIFT",
            Operation::ArtShift => "ART_SHIFT",
            Operation::SetFont => "SET_FONT",
            Operation::SaveUndo => "SAVE_UNDO",
            Operation::RestoreUndo => "RESTORE_UNDO",
            Operation::PrintUnicode => "PRINT_UNICODE",
            Operation::CheckUnicode => "CHECK_UNICODE",
            Operation::SetTrueColour => "SET_TRUE_COLOUR",
            Operation::Unknown => "UNKNOWN!",
        }
    }
}

/// Resolve an opcode number to an operation for a specific version.
///
/// This is the only place that knows which opcode numbers were reassigned between versions
/// and which instructions carry a store byte or branch field.
///
/// # Arguments
/// * `version` - Z-machine version
/// * `form` - [OpcodeForm]
/// * `operand_count` - [OperandCount]
/// * `instruction` - opcode number within its operand count
///
/// # Returns
/// Tuple containing (operation, has store byte, has branch field)
pub fn resolve(
    version: u8,
    form: OpcodeForm,
    operand_count: OperandCount,
    instruction: u8,
) -> (Operation, bool, bool) {
    use Operation::*;

    if form == OpcodeForm::Ext {
        return match instruction {
            0x00 => (Save, true, false),
            0x01 => (Restore, true, false),
            0x02 => (LogShift, true, false),
            0x03 => (ArtShift, true, false),
            0x04 => (SetFont, true, false),
            0x09 => (SaveUndo, true, false),
            0x0A => (RestoreUndo, true, false),
            0x0B => (PrintUnicode, false, false),
            0x0C => (CheckUnicode, true, false),
            0x0D => (SetTrueColour, false, false),
            _ => (Unknown, false, false),
        };
    }

    match operand_count {
        OperandCount::_0OP => match (instruction, version) {
            (0x0, _) => (Rtrue, false, false),
            (0x1, _) => (Rfalse, false, false),
            (0x2, _) => (Print, false, false),
            (0x3, _) => (PrintRet, false, false),
            (0x4, _) => (Nop, false, false),
            (0x5, 1..=3) => (Save, false, true),
            (0x5, 4) => (Save, true, false),
            (0x6, 1..=3) => (Restore, false, true),
            (0x6, 4) => (Restore, true, false),
            (0x7, _) => (Restart, false, false),
            (0x8, _) => (RetPopped, false, false),
            (0x9, 1..=4) => (Pop, false, false),
            (0x9, _) => (Catch, true, false),
            (0xA, _) => (Quit, false, false),
            (0xB, _) => (NewLine, false, false),
            (0xC, 1..=3) => (ShowStatus, false, false),
            (0xD, _) => (Verify, false, true),
            (0xF, _) => (Piracy, false, true),
            (_, _) => (Unknown, false, false),
        },
        OperandCount::_1OP => match (instruction, version) {
            (0x0, _) => (Jz, false, true),
            (0x1, _) => (GetSibling, true, true),
            (0x2, _) => (GetChild, true, true),
            (0x3, _) => (GetParent, true, false),
            (0x4, _) => (GetPropLen, true, false),
            (0x5, _) => (Inc, false, false),
            (0x6, _) => (Dec, false, false),
            (0x7, _) => (PrintAddr, false, false),
            (0x8, 4..) => (Call1S, true, false),
            (0x9, _) => (RemoveObj, false, false),
            (0xA, _) => (PrintObj, false, false),
            (0xB, _) => (Ret, false, false),
            (0xC, _) => (Jump, false, false),
            (0xD, _) => (PrintPaddr, false, false),
            (0xE, _) => (Load, true, false),
            (0xF, 1..=4) => (Not, true, false),
            (0xF, _) => (Call1N, false, false),
            (_, _) => (Unknown, false, false),
        },
        OperandCount::_2OP => match (instruction, version) {
            (0x01, _) => (Je, false, true),
            (0x02, _) => (Jl, false, true),
            (0x03, _) => (Jg, false, true),
            (0x04, _) => (DecChk, false, true),
            (0x05, _) => (IncChk, false, true),
            (0x06, _) => (Jin, false, true),
            (0x07, _) => (Test, false, true),
            (0x08, _) => (Or, true, false),
            (0x09, _) => (And, true, false),
            (0x0A, _) => (TestAttr, false, true),
            (0x0B, _) => (SetAttr, false, false),
            (0x0C, _) => (ClearAttr, false, false),
            (0x0D, _) => (Store, false, false),
            (0x0E, _) => (InsertObj, false, false),
            (0x0F, _) => (Loadw, true, false),
            (0x10, _) => (Loadb, true, false),
            (0x11, _) => (GetProp, true, false),
            (0x12, _) => (GetPropAddr, true, false),
            (0x13, _) => (GetNextProp, true, false),
            (0x14, _) => (Add, true, false),
            (0x15, _) => (Sub, true, false),
            (0x16, _) => (Mul, true, false),
            (0x17, _) => (Div, true, false),
            (0x18, _) => (Mod, true, false),
            (0x19, 4..) => (Call2S, true, false),
            (0x1A, 5..) => (Call2N, false, false),
            (0x1B, 5..) => (SetColour, false, false),
            (0x1C, 5..) => (Throw, false, false),
            (_, _) => (Unknown, false, false),
        },
        OperandCount::_VAR => match (instruction, version) {
            (0x00, _) => (Call, true, false),
            (0x01, _) => (Storew, false, false),
            (0x02, _) => (Storeb, false, false),
            (0x03, _) => (PutProp, false, false),
            (0x04, 1..=4) => (Sread, false, false),
            (0x04, _) => (Aread, true, false),
            (0x05, _) => (PrintChar, false, false),
            (0x06, _) => (PrintNum, false, false),
            (0x07, _) => (Random, true, false),
            (0x08, _) => (Push, false, false),
            (0x09, _) => (Pull, false, false),
            (0x0A, 3..) => (SplitWindow, false, false),
            (0x0B, 3..) => (SetWindow, false, false),
            (0x0C, 4..) => (CallVs2, true, false),
            (0x0D, 4..) => (EraseWindow, false, false),
            (0x0E, 4..) => (EraseLine, false, false),
            (0x0F, 4..) => (SetCursor, false, false),
            (0x10, 4..) => (GetCursor, false, false),
            (0x11, 4..) => (SetTextStyle, false, false),
            (0x12, 4..) => (BufferMode, false, false),
            (0x13, 3..) => (OutputStream, false, false),
            (0x14, 3..) => (InputStream, false, false),
            (0x15, 3..) => (SoundEffect, false, false),
            (0x16, 4..) => (ReadChar, true, false),
            (0x17, 4..) => (ScanTable, true, true),
            (0x18, 5..) => (Not, true, false),
            (0x19, 5..) => (CallVn, false, false),
            (0x1A, 5..) => (CallVn2, false, false),
            (0x1B, 5..) => (Tokenise, false, false),
            (0x1C, 5..) => (EncodeText, false, false),
            (0x1D, 5..) => (CopyTable, false, false),
            (0x1E, 5..) => (PrintTable, false, false),
            (0x1F, 5..) => (CheckArgCount, false, true),
            (_, _) => (Unknown, false, false),
        },
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// Opcode
pub struct Opcode {
    version: u8,
    opcode: u8,
    form: OpcodeForm,
    instruction: u8,
    operand_count: OperandCount,
    operation: Operation,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.operation {
            Operation::Unknown => write!(
                f,
                "UNKNOWN! ({:?} {:?} ${:02x} / #{:02x})",
                self.form, self.operand_count, self.opcode, self.instruction
            ),
            Operation::Call if self.version > 3 => write!(f, "CALL_VS"),
            _ => write!(f, "{}", self.operation.name()),
        }
    }
}

impl Opcode {
    /// Constructor
    ///
    /// # Arguments
    /// * `version` - Z-machine version
    /// * `opcode` - opcode byte
    /// * `instruction` - opcode number
    /// * `form` - [OpcodeForm]
    /// * `operand_count` - [OperandCount]
    pub fn new(
        version: u8,
        opcode: u8,
        instruction: u8,
        form: OpcodeForm,
        operand_count: OperandCount,
    ) -> Opcode {
        let (operation, _, _) = resolve(version, form, operand_count, instruction);
        Opcode {
            version,
            opcode,
            instruction,
            form,
            operand_count,
            operation,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn form(&self) -> OpcodeForm {
        self.form
    }

    pub fn instruction(&self) -> u8 {
        self.instruction
    }

    pub fn operand_count(&self) -> OperandCount {
        self.operand_count
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// [Instruction](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html#one)
pub struct Instruction {
    /// Address of the instruction in memory
    address: usize,
    /// Instruction [Opcode]
    opcode: Opcode,
    /// Vector of [Operand] values
    operands: Vec<Operand>,
    /// [Option] containing the [StoreResult] if the instruction stores a result
    store: Option<StoreResult>,
    /// [Option] containing the [Branch] information if the instruction branches
    branch: Option<Branch>,
    /// Address of the instruction immediately following this one in memory
    next_address: usize,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${:05x}: {}", self.address, self.opcode)?;

        for o in &self.operands {
            write!(f, " {}", o)?;
        }

        if let Some(s) = self.store {
            write!(f, " -> {}", s)?
        }

        if let Some(b) = &self.branch {
            write!(f, " {}", b)?
        }

        Ok(())
    }
}

impl Instruction {
    pub fn new(
        address: usize,
        opcode: Opcode,
        operands: Vec<Operand>,
        store: Option<StoreResult>,
        branch: Option<Branch>,
        next_address: usize,
    ) -> Instruction {
        Instruction {
            address,
            opcode,
            operands,
            store,
            branch,
            next_address,
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn opcode(&self) -> &Opcode {
        &self.opcode
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn store(&self) -> Option<&StoreResult> {
        self.store.as_ref()
    }

    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    pub fn next_address(&self) -> usize {
        self.next_address
    }
}
