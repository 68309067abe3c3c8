//! Bitwise complement and arithmetic negation, each in immediate,
//! unary (in place), and binary (`Rx,Ry` -> `Rx`) forms.

use super::{Cpu, VideoAudioPort};
use crate::error::Chip16Error;
use crate::utils::complement;

pub fn noti<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, imm: u16) -> Result<(), Chip16Error> {
    let result = !imm;
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
    Ok(())
}

pub fn not_unary<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8) {
    let result = !cpu.registers[x as usize];
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
}

pub fn not_binary<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8) {
    let result = !cpu.registers[y as usize];
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
}

pub fn negi<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, imm: u16) -> Result<(), Chip16Error> {
    let result = complement(imm);
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
    Ok(())
}

pub fn neg_unary<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8) {
    let result = complement(cpu.registers[x as usize]);
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
}

pub fn neg_binary<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8) {
    let result = complement(cpu.registers[y as usize]);
    cpu.registers[x as usize] = result;
    cpu.flag_set(result);
}
