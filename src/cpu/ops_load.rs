//! Loads: immediate, memory, and register-to-register moves.
//!
//! `LDI Rx,HHLL` and `LDI SP,HHLL` carry a documented anomaly from the
//! original source: neither loads the literal `HHLL`, both read through
//! `mem[HHLL]` first. `LDM Rx,HHLL` goes one indirection further —
//! `mem[mem[HHLL]]` — which is `LDM`'s intended behavior, not a bug.
//! Preserved bit-exactly rather than "fixed", since programs assembled
//! against the original behavior depend on it.

use super::{Cpu, VideoAudioPort};
use crate::error::Chip16Error;

pub fn ldi<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, imm: u16) -> Result<(), Chip16Error> {
    cpu.registers[x as usize] = cpu.memory.read16(imm)?;
    Ok(())
}

pub fn ldi_sp<P: VideoAudioPort>(cpu: &mut Cpu<P>, imm: u16) -> Result<(), Chip16Error> {
    cpu.sp = cpu.memory.read16(imm)?;
    Ok(())
}

pub fn ldm_imm<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, imm: u16) -> Result<(), Chip16Error> {
    let pointer = cpu.memory.read16(imm)?;
    cpu.registers[x as usize] = cpu.memory.read16(pointer)?;
    Ok(())
}

pub fn ldm_reg<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8) -> Result<(), Chip16Error> {
    let addr = cpu.registers[y as usize];
    cpu.registers[x as usize] = cpu.memory.read16(addr)?;
    Ok(())
}

pub fn mov<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8) {
    cpu.registers[x as usize] = cpu.registers[y as usize];
}
