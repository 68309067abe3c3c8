//! Stores: register to memory, by literal address or by register.

use super::{Cpu, VideoAudioPort};
use crate::error::Chip16Error;

pub fn stm_imm<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, imm: u16) -> Result<(), Chip16Error> {
    cpu.memory.write16(imm, cpu.registers[x as usize])?;
    Ok(())
}

pub fn stm_reg<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8) -> Result<(), Chip16Error> {
    let addr = cpu.registers[y as usize];
    cpu.memory.write16(addr, cpu.registers[x as usize])?;
    Ok(())
}
