//! Arithmetic and logic group (opcodes `0x4_`-`0xA_`): add, subtract,
//! compare, bitwise and/test, or, xor, multiply, divide, modulo, and
//! remainder — each in immediate (`Rx,HHLL`), register (`Rx,Ry`), and
//! where the instruction set provides one, ternary (`Rx,Ry,Rz`) forms.
//!
//! Compare and test share their arithmetic with subtract and and,
//! respectively, but discard the result and only keep the flag update.

use super::{Cpu, VideoAudioPort};
use crate::error::Chip16Error;

/// `group` is the opcode's high nibble (e.g. `0x40` for the add family),
/// `variant` its low nibble, selecting immediate/binary/ternary form.
/// `address`/`word` are the instruction's own location and raw encoding,
/// carried through only so the no-match arm can report a correctly
/// addressed `InvalidOpcode` rather than inventing one from whatever `pc`
/// happens to be by the time this runs.
pub fn execute<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    address: u16,
    word: u32,
    group: u8,
    variant: u8,
    x: u8,
    y: u8,
    z: u8,
    imm: u16,
) -> Result<(), Chip16Error> {
    match (group, variant) {
        (0x40, 0) => immediate(cpu, x, imm, Cpu::add16),
        (0x40, 1) => binary(cpu, x, y, Cpu::add16),
        (0x40, 2) => ternary(cpu, x, y, z, Cpu::add16),

        (0x50, 0) => immediate(cpu, x, imm, Cpu::sub16),
        (0x50, 1) => binary(cpu, x, y, Cpu::sub16),
        (0x50, 2) => ternary(cpu, x, y, z, Cpu::sub16),
        (0x50, 3) => discard_immediate(cpu, x, imm, Cpu::sub16),
        (0x50, 4) => discard_binary(cpu, x, y, Cpu::sub16),

        (0x60, 0) => immediate(cpu, x, imm, Cpu::and16),
        (0x60, 1) => binary(cpu, x, y, Cpu::and16),
        (0x60, 2) => ternary(cpu, x, y, z, Cpu::and16),
        (0x60, 3) => discard_immediate(cpu, x, imm, Cpu::and16),
        (0x60, 4) => discard_binary(cpu, x, y, Cpu::and16),

        (0x70, 0) => immediate(cpu, x, imm, Cpu::or16),
        (0x70, 1) => binary(cpu, x, y, Cpu::or16),
        (0x70, 2) => ternary(cpu, x, y, z, Cpu::or16),

        (0x80, 0) => immediate(cpu, x, imm, Cpu::xor16),
        (0x80, 1) => binary(cpu, x, y, Cpu::xor16),
        (0x80, 2) => ternary(cpu, x, y, z, Cpu::xor16),

        (0x90, 0) => immediate(cpu, x, imm, Cpu::mul16),
        (0x90, 1) => binary(cpu, x, y, Cpu::mul16),
        (0x90, 2) => ternary(cpu, x, y, z, Cpu::mul16),

        (0xA0, 0) => immediate(cpu, x, imm, Cpu::div16),
        (0xA0, 1) => binary(cpu, x, y, Cpu::div16),
        (0xA0, 2) => ternary(cpu, x, y, z, Cpu::div16),
        (0xA0, 3) => immediate(cpu, x, imm, Cpu::mod16),
        (0xA0, 4) => binary(cpu, x, y, Cpu::mod16),
        (0xA0, 5) => ternary(cpu, x, y, z, Cpu::mod16),
        (0xA0, 6) => immediate(cpu, x, imm, Cpu::rem16),
        (0xA0, 7) => binary(cpu, x, y, Cpu::rem16),
        (0xA0, 8) => ternary(cpu, x, y, z, Cpu::rem16),

        _ => Err(Chip16Error::InvalidOpcode { address, opcode: word }),
    }
}

/// `Rx,HHLL` reads its right operand through `mem[HHLL]`, not the literal
/// word — the same indirection `LDI` applies, carried through every ALU
/// immediate form rather than special-cased for just one opcode.
fn immediate<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    imm: u16,
    op: impl FnOnce(&mut Cpu<P>, u16, u16) -> u16,
) -> Result<(), Chip16Error> {
    let r = cpu.memory.read16(imm)?;
    store(cpu, x, |cpu, l| op(cpu, l, r))
}

fn discard_immediate<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    imm: u16,
    op: impl FnOnce(&mut Cpu<P>, u16, u16) -> u16,
) -> Result<(), Chip16Error> {
    let r = cpu.memory.read16(imm)?;
    discard(cpu, x, |cpu, l| op(cpu, l, r))
}

fn store<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    op: impl FnOnce(&mut Cpu<P>, u16) -> u16,
) -> Result<(), Chip16Error> {
    let l = cpu.registers[x as usize];
    cpu.registers[x as usize] = op(cpu, l);
    Ok(())
}

fn discard<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    op: impl FnOnce(&mut Cpu<P>, u16) -> u16,
) -> Result<(), Chip16Error> {
    let l = cpu.registers[x as usize];
    op(cpu, l);
    Ok(())
}

fn binary<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    y: u8,
    op: impl FnOnce(&mut Cpu<P>, u16, u16) -> u16,
) -> Result<(), Chip16Error> {
    let (l, r) = (cpu.registers[x as usize], cpu.registers[y as usize]);
    cpu.registers[x as usize] = op(cpu, l, r);
    Ok(())
}

fn discard_binary<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    y: u8,
    op: impl FnOnce(&mut Cpu<P>, u16, u16) -> u16,
) -> Result<(), Chip16Error> {
    let (l, r) = (cpu.registers[x as usize], cpu.registers[y as usize]);
    op(cpu, l, r);
    Ok(())
}

fn ternary<P: VideoAudioPort>(
    cpu: &mut Cpu<P>,
    x: u8,
    y: u8,
    z: u8,
    op: impl FnOnce(&mut Cpu<P>, u16, u16) -> u16,
) -> Result<(), Chip16Error> {
    let (l, r) = (cpu.registers[x as usize], cpu.registers[y as usize]);
    cpu.registers[z as usize] = op(cpu, l, r);
    Ok(())
}
