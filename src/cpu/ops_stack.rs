//! Stack operations. The stack pointer starts at the base of the
//! reserved stack region and grows upward; `PUSH`/`CALL` are the only
//! writers that advance it.

use super::{Cpu, Flags, VideoAudioPort};
use crate::error::Chip16Error;

pub fn push<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8) -> Result<(), Chip16Error> {
    cpu.memory.write16(cpu.sp, cpu.registers[x as usize])?;
    cpu.sp = cpu.sp.wrapping_add(2);
    Ok(())
}

pub fn pop<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8) -> Result<(), Chip16Error> {
    cpu.sp = cpu.sp.wrapping_sub(2);
    cpu.registers[x as usize] = cpu.memory.read16(cpu.sp)?;
    Ok(())
}

pub fn pushall<P: VideoAudioPort>(cpu: &mut Cpu<P>) -> Result<(), Chip16Error> {
    for r in 0..16 {
        cpu.memory.write16(cpu.sp, cpu.registers[r])?;
        cpu.sp = cpu.sp.wrapping_add(2);
    }
    Ok(())
}

pub fn popall<P: VideoAudioPort>(cpu: &mut Cpu<P>) -> Result<(), Chip16Error> {
    for r in (0..16).rev() {
        cpu.sp = cpu.sp.wrapping_sub(2);
        cpu.registers[r] = cpu.memory.read16(cpu.sp)?;
    }
    Ok(())
}

pub fn pushf<P: VideoAudioPort>(cpu: &mut Cpu<P>) -> Result<(), Chip16Error> {
    cpu.memory.write16(cpu.sp, cpu.flags.bits() as u16)?;
    cpu.sp = cpu.sp.wrapping_add(2);
    Ok(())
}

pub fn popf<P: VideoAudioPort>(cpu: &mut Cpu<P>) -> Result<(), Chip16Error> {
    cpu.sp = cpu.sp.wrapping_sub(2);
    let bits = cpu.memory.read16(cpu.sp)?;
    cpu.flags = Flags::from_bits_truncate(bits as u8);
    Ok(())
}
