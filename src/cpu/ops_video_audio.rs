//! `DRW`, `SND`, and `SNG` forward their arguments to the attached
//! `VideoAudioPort` rather than doing any drawing or synthesis
//! themselves — this crate has no framebuffer or audio device of its own.

use super::{Cpu, VideoAudioPort};
use crate::error::Chip16Error;

pub fn drw_imm<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8, sprite_address: u16) {
    let (px, py) = (cpu.registers[x as usize] as i16, cpu.registers[y as usize] as i16);
    cpu.port.draw_sprite(px, py, sprite_address);
}

/// `z` names the register holding the sprite's address, not the address
/// itself — the word form above carries the address as a literal, this
/// form carries it indirectly through `Rz`.
pub fn drw_reg<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, y: u8, z: u8) {
    let (px, py) = (cpu.registers[x as usize] as i16, cpu.registers[y as usize] as i16);
    let sprite_address = cpu.registers[z as usize];
    cpu.port.draw_sprite(px, py, sprite_address);
}

pub fn snp<P: VideoAudioPort>(cpu: &mut Cpu<P>, x: u8, freq_address: u16) -> Result<(), Chip16Error> {
    let freq = cpu.memory.read16(freq_address)?;
    cpu.port.play_tone(cpu.registers[x as usize] as u8, freq);
    Ok(())
}

pub fn sng<P: VideoAudioPort>(cpu: &mut Cpu<P>, envelope: u8, freq: u16) {
    cpu.port.set_tone_envelope(envelope);
    cpu.port.play_tone(0, freq);
}
