//! Shift group (opcodes `0xB0`-`0xB5`).
//!
//! Only the shift *direction* is distinguished by opcode byte for the
//! nibble-shift-amount forms: `0xB0` is left-by-`N`, `0xB1` is
//! right-by-`N`. The source this is grounded on maps both `SHR Rx,N` and
//! `SAR Rx,N` to the same `0xB1` byte, so the CPU can only give that byte
//! one meaning; it executes as logical (zero-filling), matching the
//! mnemonic the encoding table lists it under. The register-operand forms
//! keep all four mnemonics on distinct bytes (`0xB2`-`0xB5`) and so do
//! not need this compromise — `0xB5` is a real, unambiguous arithmetic
//! right shift.

use super::{Cpu, Flags, VideoAudioPort};
use crate::utils::is_neg;

pub fn shift_by_nibble<P: VideoAudioPort>(cpu: &mut Cpu<P>, opcode: u8, x: u8, n: u8) {
    let value = cpu.registers[x as usize];
    let result = match opcode {
        0xB0 => value.wrapping_shl(n as u32),
        0xB1 => value.wrapping_shr(n as u32),
        _ => unreachable!("shift_by_nibble only handles 0xB0/0xB1"),
    };
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
}

pub fn shift_by_register<P: VideoAudioPort>(cpu: &mut Cpu<P>, opcode: u8, x: u8, y: u8) {
    let value = cpu.registers[x as usize];
    let shift = cpu.registers[y as usize] & 0xF;
    let result = match opcode {
        0xB2 | 0xB4 => value.wrapping_shl(shift as u32), // SHL, SAL
        0xB3 => value.wrapping_shr(shift as u32),        // SHR: logical
        0xB5 => {
            // SAR: arithmetic right shift, sign-extending.
            if is_neg(value) {
                let shifted = value.wrapping_shr(shift as u32);
                let sign_mask = if shift == 0 {
                    0
                } else {
                    0xFFFFu16.wrapping_shl(16 - shift as u32)
                };
                shifted | sign_mask
            } else {
                value.wrapping_shr(shift as u32)
            }
        }
        _ => unreachable!("shift_by_register only handles 0xB2..=0xB5"),
    };
    cpu.registers[x as usize] = result;
    cpu.flags.set(Flags::ZERO, result == 0);
    cpu.flags.set(Flags::NEGATIVE, is_neg(result));
}
