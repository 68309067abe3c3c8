//! The instruction table: for each mnemonic, an ordered list of candidate
//! operand shapes and the opcode byte each encodes to.
//!
//! Candidate order matters and is preserved from the source this is
//! ported from, including two quirks that are bugs rather than features:
//! `SNG`'s first candidate (`Rx,HHLL`) is structurally identical to
//! `SNP`'s real encoding and is never reachable through `SNG`'s actual
//! `byte,HHLL` grammar — it's dead, but removing it would be "fixing" a
//! decision this isn't ours to make. `SAL`/`SHR`/`SAR`'s nibble-shift
//! forms all share `SHL`'s `0xB0`/`0xB1` opcodes with no way to tell
//! which mnemonic produced a given nibble-shift instruction once
//! assembled — see `cpu::ops_shift` for how the interpreter resolves
//! that collision.

use super::operand::{parse_bit, parse_byte, parse_nibble, parse_reg, parse_sp, parse_word, Operand};

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Nullary,
    UnaryReg,
    UnaryWord,
    Nibble,
    BinaryRegWord,
    BinaryRegReg,
    BinaryRegNibble,
    BinarySpWord,
    ByteWord,
    BitBit,
    TrinaryRegRegReg,
    TrinaryRegRegWord,
}

pub struct Candidate {
    pub shape: Shape,
    pub opcode: u8,
}

const fn c(shape: Shape, opcode: u8) -> Candidate {
    Candidate { shape, opcode }
}

/// Look up a mnemonic's ordered candidate list. `None` if it isn't a
/// recognized instruction.
pub fn candidates(mnemonic: &str) -> Option<&'static [Candidate]> {
    use Shape::*;
    Some(match mnemonic {
        "NOP" => &[c(Nullary, 0x00)],
        "CLS" => &[c(Nullary, 0x01)],
        "VBLNK" => &[c(Nullary, 0x02)],
        "BGC" => &[c(Nibble, 0x03)],
        "SPR" => &[c(UnaryWord, 0x04)],
        "DRW" => &[c(TrinaryRegRegReg, 0x06), c(TrinaryRegRegWord, 0x05)],
        "RND" => &[c(BinaryRegWord, 0x07)],
        "FLIP" => &[c(BitBit, 0x08)],
        "SND0" => &[c(Nullary, 0x09)],
        "SND1" => &[c(UnaryWord, 0x0A)],
        "SND2" => &[c(UnaryWord, 0x0B)],
        "SND3" => &[c(UnaryWord, 0x0C)],
        "SNP" => &[c(BinaryRegWord, 0x0D)],
        "SNG" => &[c(BinaryRegWord, 0x0D), c(ByteWord, 0x0E)],

        "JMP" => &[c(UnaryWord, 0x10), c(UnaryReg, 0x16)],
        "JME" => &[c(TrinaryRegRegWord, 0x13)],
        "CALL" => &[c(UnaryWord, 0x14), c(UnaryReg, 0x18)],
        "RET" => &[c(Nullary, 0x15)],

        "LDI" => &[c(BinaryRegWord, 0x20), c(BinarySpWord, 0x21)],
        "LDM" => &[c(BinaryRegWord, 0x22), c(BinaryRegReg, 0x23)],
        "MOV" => &[c(BinaryRegReg, 0x24)],

        "STM" => &[c(BinaryRegWord, 0x30), c(BinaryRegReg, 0x31)],

        "ADDI" => &[c(BinaryRegWord, 0x40)],
        "ADD" => &[c(BinaryRegReg, 0x41), c(TrinaryRegRegReg, 0x42)],

        "SUBI" => &[c(BinaryRegWord, 0x50)],
        "SUB" => &[c(BinaryRegReg, 0x51), c(TrinaryRegRegReg, 0x52)],
        "CMPI" => &[c(BinaryRegWord, 0x53)],
        "CMP" => &[c(BinaryRegReg, 0x54)],

        "ANDI" => &[c(BinaryRegWord, 0x60)],
        "AND" => &[c(BinaryRegReg, 0x61), c(TrinaryRegRegReg, 0x62)],
        "TSTI" => &[c(BinaryRegWord, 0x63)],
        "TST" => &[c(BinaryRegReg, 0x64)],

        "ORI" => &[c(BinaryRegWord, 0x70)],
        "OR" => &[c(BinaryRegReg, 0x71), c(TrinaryRegRegReg, 0x72)],
        "XORI" => &[c(BinaryRegWord, 0x80)],
        "XOR" => &[c(BinaryRegReg, 0x81), c(TrinaryRegRegReg, 0x82)],
        "MULI" => &[c(BinaryRegWord, 0x90)],
        "MUL" => &[c(BinaryRegReg, 0x91), c(TrinaryRegRegReg, 0x92)],

        "DIVI" => &[c(BinaryRegWord, 0xA0)],
        "DIV" => &[c(BinaryRegReg, 0xA1), c(TrinaryRegRegReg, 0xA2)],
        "MODI" => &[c(BinaryRegWord, 0xA3)],
        "MOD" => &[c(BinaryRegReg, 0xA4), c(TrinaryRegRegReg, 0xA5)],
        "REMI" => &[c(BinaryRegWord, 0xA6)],
        "REM" => &[c(BinaryRegReg, 0xA7), c(TrinaryRegRegReg, 0xA8)],

        "SHL" => &[c(BinaryRegNibble, 0xB0), c(BinaryRegReg, 0xB2)],
        "SHR" => &[c(BinaryRegNibble, 0xB1), c(BinaryRegReg, 0xB3)],
        "SAL" => &[c(BinaryRegNibble, 0xB0), c(BinaryRegReg, 0xB4)],
        "SAR" => &[c(BinaryRegNibble, 0xB1), c(BinaryRegReg, 0xB5)],

        "PUSH" => &[c(UnaryReg, 0xC0)],
        "POP" => &[c(UnaryReg, 0xC1)],
        "PUSHALL" => &[c(Nullary, 0xC2)],
        "POPALL" => &[c(Nullary, 0xC3)],
        "PUSHF" => &[c(Nullary, 0xC4)],
        "POPF" => &[c(Nullary, 0xC5)],

        "PAL" => &[c(UnaryWord, 0xD0), c(UnaryReg, 0xD1)],

        "NOTI" => &[c(BinaryRegWord, 0xE0)],
        "NOT" => &[c(UnaryReg, 0xE1), c(BinaryRegReg, 0xE2)],
        "NEGI" => &[c(BinaryRegWord, 0xE3)],
        "NEG" => &[c(UnaryReg, 0xE4), c(BinaryRegReg, 0xE5)],

        _ => return None,
    })
}

/// Try to match `tokens` against `shape`, producing the parsed operands
/// in instruction order. `None` means this candidate doesn't apply —
/// the caller moves on to the next one.
pub fn match_shape(shape: Shape, tokens: &[String]) -> Option<Vec<Operand>> {
    match shape {
        Shape::Nullary => {
            if tokens.is_empty() {
                Some(vec![])
            } else {
                None
            }
        }
        Shape::UnaryReg => match tokens {
            [a] => Some(vec![Operand::Reg(parse_reg(a)?)]),
            _ => None,
        },
        Shape::UnaryWord => match tokens {
            [a] => Some(vec![Operand::Word(parse_word(a)?)]),
            _ => None,
        },
        Shape::Nibble => match tokens {
            [a] => Some(vec![Operand::Nibble(parse_nibble(a)?)]),
            _ => None,
        },
        Shape::BinaryRegWord => match tokens {
            [a, b] => Some(vec![Operand::Reg(parse_reg(a)?), Operand::Word(parse_word(b)?)]),
            _ => None,
        },
        Shape::BinaryRegReg => match tokens {
            [a, b] => Some(vec![Operand::Reg(parse_reg(a)?), Operand::Reg(parse_reg(b)?)]),
            _ => None,
        },
        Shape::BinaryRegNibble => match tokens {
            [a, b] => Some(vec![Operand::Reg(parse_reg(a)?), Operand::Nibble(parse_nibble(b)?)]),
            _ => None,
        },
        Shape::BinarySpWord => match tokens {
            [a, b] if parse_sp(a) => Some(vec![Operand::Sp, Operand::Word(parse_word(b)?)]),
            _ => None,
        },
        Shape::ByteWord => match tokens {
            [a, b] => Some(vec![Operand::Byte(parse_byte(a)?), Operand::Word(parse_word(b)?)]),
            _ => None,
        },
        Shape::BitBit => match tokens {
            [a, b] => Some(vec![Operand::Bit(parse_bit(a)?), Operand::Bit(parse_bit(b)?)]),
            _ => None,
        },
        Shape::TrinaryRegRegReg => match tokens {
            [a, b, d] => Some(vec![
                Operand::Reg(parse_reg(a)?),
                Operand::Reg(parse_reg(b)?),
                Operand::Reg(parse_reg(d)?),
            ]),
            _ => None,
        },
        Shape::TrinaryRegRegWord => match tokens {
            [a, b, d] => Some(vec![
                Operand::Reg(parse_reg(a)?),
                Operand::Reg(parse_reg(b)?),
                Operand::Word(parse_word(d)?),
            ]),
            _ => None,
        },
    }
}

/// Encode a matched operand list into the 4-byte instruction word.
/// Assumes `operands` was produced by `match_shape` for the same
/// `shape` — the positions and variants line up by construction.
pub fn encode(shape: Shape, opcode: u8, operands: &[Operand]) -> [u8; 4] {
    let word = |w: u16| ((w & 0xFF) as u8, (w >> 8) as u8);
    match (shape, operands) {
        (Shape::Nullary, []) => [opcode, 0, 0, 0],
        (Shape::UnaryReg, [Operand::Reg(x)]) => [opcode, *x, 0, 0],
        (Shape::UnaryWord, [Operand::Word(w)]) => {
            let (lo, hi) = word(*w);
            [opcode, 0, lo, hi]
        }
        (Shape::Nibble, [Operand::Nibble(n)]) => [opcode, 0, *n, 0],
        (Shape::BinaryRegWord, [Operand::Reg(x), Operand::Word(w)]) => {
            let (lo, hi) = word(*w);
            [opcode, *x, lo, hi]
        }
        (Shape::BinaryRegReg, [Operand::Reg(x), Operand::Reg(y)]) => {
            [opcode, (y << 4) | x, 0, 0]
        }
        (Shape::BinaryRegNibble, [Operand::Reg(x), Operand::Nibble(n)]) => [opcode, *x, *n, 0],
        (Shape::BinarySpWord, [Operand::Sp, Operand::Word(w)]) => {
            let (lo, hi) = word(*w);
            [opcode, 0, lo, hi]
        }
        (Shape::ByteWord, [Operand::Byte(b), Operand::Word(w)]) => {
            let (lo, hi) = word(*w);
            [opcode, *b, lo, hi]
        }
        (Shape::BitBit, [Operand::Bit(h), Operand::Bit(v)]) => [opcode, 0, 0, (h << 1) | v],
        (Shape::TrinaryRegRegReg, [Operand::Reg(x), Operand::Reg(y), Operand::Reg(z)]) => {
            [opcode, (y << 4) | x, *z, 0]
        }
        (Shape::TrinaryRegRegWord, [Operand::Reg(x), Operand::Reg(y), Operand::Word(w)]) => {
            let (lo, hi) = word(*w);
            [opcode, (y << 4) | x, lo, hi]
        }
        _ => unreachable!("encode called with operands that don't match its shape"),
    }
}
