use thiserror::Error;

/// The single error type shared by the memory, ROM, CPU, and assembler
/// subsystems. No error is swallowed internally — callers always see the
/// first failure with the rest of the state left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Chip16Error {
    /// The opcode byte did not match any instruction, or an instruction's
    /// reserved bits were nonzero.
    #[error("invalid opcode at address {address:#06x}: {opcode:#010x}")]
    InvalidOpcode { address: u16, opcode: u32 },

    /// A memory access targeted a byte beyond `0xFFFE`.
    #[error("address {0:#06x} is out of range")]
    AddressOutOfRange(u32),

    /// No candidate encoder accepted the operand tokens for a mnemonic.
    #[error("line {line}: no encoding of {mnemonic:?} matches operands {tokens:?}")]
    SignatureMismatch {
        line: usize,
        mnemonic: String,
        tokens: Vec<String>,
    },

    /// The first token on a line was not a recognized mnemonic.
    #[error("line {line}: unknown instruction {mnemonic:?}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    /// A token could not be parsed as the operand kind its position
    /// requires (e.g. `R16` as a register, or `ZZZZ` as a hex word).
    #[error("line {line}: {message}")]
    InvalidOperand { line: usize, message: String },

    /// The ROM header was shorter than 16 bytes, or its declared size
    /// disagreed with the file length.
    #[error("malformed ROM: {0}")]
    MalformedRom(String),

    /// The header's declared checksum did not match the computed CRC-32.
    /// Not fatal — callers decide whether to reject the ROM.
    #[error("checksum mismatch: header declared {declared:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { declared: u32, computed: u32 },
}
