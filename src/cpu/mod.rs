//! The chip16 interpreter: register file, flags, program counter, stack
//! pointer, and the fetch-decode-execute step loop.
//!
//! A plain struct holds the machine state; a `tick()` fetches one
//! instruction and dispatches it through per-opcode-group tables; free
//! functions (not methods on an enum) implement each instruction, split
//! across `cpu::ops_*` submodules by opcode family.
//!
//! chip16 has no cartridge mapper, so the CPU owns its `Memory` directly.

mod ops_alu;
mod ops_jump;
mod ops_load;
mod ops_notneg;
mod ops_shift;
mod ops_stack;
mod ops_store;
mod ops_video_audio;

#[cfg(test)]
mod test_helpers;


use bitflags::bitflags;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::error::Chip16Error;
use crate::memory::{Memory, STACK_BASE};

bitflags! {
    /// The four named condition flags. Other bits are reserved zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const CARRY    = 0b0000_0010;
        const ZERO     = 0b0000_0100;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

/// Interface contract for the video/audio/input front-end, treated as an
/// external collaborator. This crate never blits a framebuffer or plays a
/// sound; it only reports that an instruction asked for one of these
/// effects, leaving the actual hardware behavior to whatever port
/// implementation is attached.
pub trait VideoAudioPort {
    fn clear_screen(&mut self) {}
    fn set_background_color(&mut self, _palette_index: u8) {}
    fn set_sprite_size(&mut self, _width: u8, _height: u8) {}
    fn draw_sprite(&mut self, _x: i16, _y: i16, _sprite_address: u16) {}
    fn set_hflip(&mut self, _hflip: bool) {}
    fn set_vflip(&mut self, _vflip: bool) {}
    fn play_tone(&mut self, _channel: u8, _frequency: u16) {}
    fn stop_tone(&mut self, _channel: u8) {}
    /// `SNG`'s byte operand: the attack/decay envelope for the next tone.
    /// Unlike `SND1`/`SND2`/`SND3`/`SNP`, which only ever carry a channel
    /// and a frequency, `SNG` also names an envelope, so it gets its own
    /// port method rather than silently folding into `play_tone`.
    fn set_tone_envelope(&mut self, _envelope: u8) {}
    fn load_palette(&mut self, _address: u16) {}
    fn select_palette_entry(&mut self, _entry: u8) {}
    fn wait_for_vblank(&mut self) {}
}

/// The default, no-op port — used whenever no real front-end is attached.
#[derive(Default)]
pub struct NullPort;
impl VideoAudioPort for NullPort {}

/// The machine state owned by one VM instance: 16 general-purpose
/// registers, flags, program counter, stack pointer, and 64 KiB of memory.
pub struct Cpu<P: VideoAudioPort = NullPort> {
    pub registers: [u16; 16],
    pub pc: u16,
    pub sp: u16,
    pub flags: Flags,
    pub memory: Memory,
    pub port: P,
    rng: Rng16,
}

/// Either the thread-local RNG or a seeded, reproducible one, so `RND` is
/// exercisable deterministically in tests without threading a generic
/// type parameter through every call site.
enum Rng16 {
    Thread(ThreadRng),
    Seeded(StdRng),
}

impl Rng16 {
    fn next_u16(&mut self, inclusive_max: u16) -> u16 {
        if inclusive_max == 0 {
            return 0;
        }
        match self {
            Rng16::Thread(rng) => rng.gen_range(0..=inclusive_max),
            Rng16::Seeded(rng) => rng.gen_range(0..=inclusive_max),
        }
    }
}

impl Cpu<NullPort> {
    pub fn new() -> Cpu<NullPort> {
        Cpu::with_port(NullPort)
    }
}

impl Default for Cpu<NullPort> {
    fn default() -> Cpu<NullPort> {
        Cpu::new()
    }
}

impl<P: VideoAudioPort> Cpu<P> {
    pub fn with_port(port: P) -> Cpu<P> {
        Cpu {
            registers: [0; 16],
            pc: 0,
            sp: STACK_BASE,
            flags: Flags::empty(),
            memory: Memory::new(),
            port,
            rng: Rng16::Thread(rand::thread_rng()),
        }
    }

    /// Deterministic construction for tests: `RND` draws from a seeded
    /// RNG instead of the thread RNG.
    pub fn with_seed(port: P, seed: u64) -> Cpu<P> {
        let mut cpu = Cpu::with_port(port);
        cpu.rng = Rng16::Seeded(StdRng::seed_from_u64(seed));
        cpu
    }

    /// Load a program at address 0 and set the initial program counter to
    /// the ROM's declared entry point.
    pub fn load_rom(&mut self, payload: &[u8], start_address: u16) {
        self.memory.load(payload);
        self.pc = start_address;
    }

    fn next_u8(&mut self) -> u8 {
        let value = self.memory.read8(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Fetch the 4-byte instruction at `pc`, advance `pc` by 4, and
    /// dispatch it. Any error raised while executing the instruction — an
    /// invalid opcode, a reserved bit set, or a memory access beyond
    /// `0xFFFE` — is fatal to this step and is surfaced to the caller
    /// unchanged, with `pc` already past the offending instruction. No
    /// error is swallowed or relabeled along the way.
    pub fn step(&mut self) -> Result<(), Chip16Error> {
        let instruction_address = self.pc;
        let b0 = self.next_u8();
        let b1 = self.next_u8();
        let b2 = self.next_u8();
        let b3 = self.next_u8();
        let word = ((b0 as u32) << 24) | ((b1 as u32) << 16) | ((b2 as u32) << 8) | (b3 as u32);

        let result = self.dispatch(instruction_address, word, b0, b1, b2, b3);
        if let Err(Chip16Error::InvalidOpcode { .. }) = &result {
            log::warn!("invalid opcode {word:#010x} at {instruction_address:#06x}");
        }
        result
    }

    /// Alias for `step`: one fetch-decode-execute cycle.
    pub fn tick(&mut self) -> Result<(), Chip16Error> {
        self.step()
    }

    fn dispatch(
        &mut self,
        address: u16,
        word: u32,
        b0: u8,
        b1: u8,
        b2: u8,
        b3: u8,
    ) -> Result<(), Chip16Error> {
        let y = (b1 >> 4) & 0xF;
        let x = b1 & 0xF;
        let z = b2 & 0xF;
        let n = b2 & 0xF;
        let imm = ((b3 as u16) << 8) | (b2 as u16);
        let invalid = || Chip16Error::InvalidOpcode { address, opcode: word };

        match b0 {
            // --- 0x: misc / video / audio -------------------------------
            0x00 => Ok(()), // NOP
            0x01 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                self.port.clear_screen();
                Ok(())
            }
            0x02 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                self.port.wait_for_vblank();
                Ok(())
            }
            0x03 => {
                if !require_zero(b1, b2 & 0xF0, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                self.port.set_background_color(n);
                Ok(())
            }
            0x04 => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                let (w, h) = (b2, b3);
                self.port.set_sprite_size(w, h);
                Ok(())
            }
            0x05 => {
                ops_video_audio::drw_imm(self, x, y, imm);
                Ok(())
            }
            0x06 => {
                if !require_zero(0, b2 & 0xF0, b3, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_video_audio::drw_reg(self, x, y, z);
                Ok(())
            }
            0x07 => {
                let max = self.memory.read16(imm)?;
                let value = self.rng.next_u16(max);
                self.registers[x as usize] = value;
                Ok(())
            }
            0x08 => {
                if !require_zero(b1, b2, b3 & 0xFC, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                let v = b3 & 0x3;
                self.port.set_hflip(v & 0b10 != 0);
                self.port.set_vflip(v & 0b01 != 0);
                Ok(())
            }
            0x09 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                self.port.stop_tone(0);
                Ok(())
            }
            0x0A | 0x0B | 0x0C => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                self.port.play_tone(b0 - 0x09, imm);
                Ok(())
            }
            0x0D => {
                ops_video_audio::snp(self, x, imm)?;
                Ok(())
            }
            0x0E => {
                // byte,word: B1 is a raw byte, not part of a register
                // operand, so it's read directly rather than through x/y.
                ops_video_audio::sng(self, b1, imm);
                Ok(())
            }

            // --- 1x: jumps / calls ---------------------------------------
            0x10 => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                ops_jump::jmp_imm(self, imm);
                Ok(())
            }
            0x13 => {
                // all fields meaningful, nothing reserved
                ops_jump::jme(self, x, y, imm);
                Ok(())
            }
            0x14 => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                ops_jump::call_imm(self, imm)?;
                Ok(())
            }
            0x15 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_jump::ret(self)?;
                Ok(())
            }
            0x16 => {
                if !require_zero(b1 & 0xF0, b2, b3, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_jump::jmp_reg(self, x);
                Ok(())
            }
            0x18 => {
                if !require_zero(b1 & 0xF0, b2, b3, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_jump::call_reg(self, x)?;
                Ok(())
            }

            // --- 2x: loads -------------------------------------------------
            0x20 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0) {
                    return Err(invalid());
                }
                ops_load::ldi(self, x, imm)?;
                Ok(())
            }
            0x21 => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                ops_load::ldi_sp(self, imm)?;
                Ok(())
            }
            0x22 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0) {
                    return Err(invalid());
                }
                ops_load::ldm_imm(self, x, imm)?;
                Ok(())
            }
            0x23 => {
                if !require_zero(0, 0, 0, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_load::ldm_reg(self, x, y)?;
                Ok(())
            }
            0x24 => {
                if !require_zero(0, 0, 0, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_load::mov(self, x, y);
                Ok(())
            }

            // --- 3x: stores -------------------------------------------------
            0x30 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0) {
                    return Err(invalid());
                }
                ops_store::stm_imm(self, x, imm)?;
                Ok(())
            }
            0x31 => {
                if !require_zero(0, 0, 0, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_store::stm_reg(self, x, y)?;
                Ok(())
            }

            // --- 4x..Ax: ALU -------------------------------------------------
            0x40..=0xA8 if is_alu_opcode(b0) => {
                // Reserved-bit layout repeats every 3 variants within a
                // group: 0/3/6 are the word-immediate forms (only B1's
                // high nibble is reserved), 1/4/7 the register forms (B2
                // and B3 fully reserved), 2/5/8 the ternary forms (B2's
                // high nibble and B3 reserved, B2's low nibble is Rz).
                let ok = match (b0 & 0x0F) % 3 {
                    0 => require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0),
                    1 => require_zero(0, b2, b3, 0, 0xFF, 0xFF),
                    _ => require_zero(0, b2 & 0xF0, b3, 0, 0xF0, 0xFF),
                };
                if !ok {
                    return Err(invalid());
                }
                self.dispatch_alu(address, word, b0, x, y, z, imm)
            }

            // --- Bx: shifts ---------------------------------------------------
            0xB0 | 0xB1 => {
                if !require_zero(b1 & 0xF0, b2 & 0xF0, b3, 0xF0, 0xF0, 0xFF) {
                    return Err(invalid());
                }
                ops_shift::shift_by_nibble(self, b0, x, n);
                Ok(())
            }
            0xB2..=0xB5 => {
                if !require_zero(0, b2 & 0x0F, b3, 0, 0x0F, 0xFF) {
                    return Err(invalid());
                }
                ops_shift::shift_by_register(self, b0, x, y);
                Ok(())
            }

            // --- Cx: stack ----------------------------------------------------
            0xC0 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::push(self, x)?;
                Ok(())
            }
            0xC1 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::pop(self, x)?;
                Ok(())
            }
            0xC2 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::pushall(self)?;
                Ok(())
            }
            0xC3 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::popall(self)?;
                Ok(())
            }
            0xC4 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::pushf(self)?;
                Ok(())
            }
            0xC5 => {
                if !require_zero(b1, b2, b3, 0xFF, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_stack::popf(self)?;
                Ok(())
            }

            // --- Dx: palette ---------------------------------------------------
            0xD0 => {
                if !require_zero(b1, 0, 0, 0xFF, 0, 0) {
                    return Err(invalid());
                }
                self.port.load_palette(imm);
                Ok(())
            }
            0xD1 => {
                if !require_zero(b1 & 0xF0, b2, b3, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                self.port.select_palette_entry(self.registers[x as usize] as u8);
                Ok(())
            }

            // --- Ex: not / neg ---------------------------------------------------
            0xE0 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0) {
                    return Err(invalid());
                }
                ops_notneg::noti(self, x, imm)?;
                Ok(())
            }
            0xE1 => {
                if !require_zero(b1 & 0xF0, b2, b3, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_notneg::not_unary(self, x);
                Ok(())
            }
            0xE2 => {
                if !require_zero(0, 0, 0, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_notneg::not_binary(self, x, y);
                Ok(())
            }
            0xE3 => {
                if !require_zero(b1 & 0xF0, 0, 0, 0xF0, 0, 0) {
                    return Err(invalid());
                }
                ops_notneg::negi(self, x, imm)?;
                Ok(())
            }
            0xE4 => {
                if !require_zero(b1 & 0xF0, b2, b3, 0xF0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_notneg::neg_unary(self, x);
                Ok(())
            }
            0xE5 => {
                if !require_zero(0, 0, 0, 0, 0xFF, 0xFF) {
                    return Err(invalid());
                }
                ops_notneg::neg_binary(self, x, y);
                Ok(())
            }

            _ => Err(invalid()),
        }
    }

    fn dispatch_alu(
        &mut self,
        address: u16,
        word: u32,
        b0: u8,
        x: u8,
        y: u8,
        z: u8,
        imm: u16,
    ) -> Result<(), Chip16Error> {
        let group = b0 & 0xF0;
        let variant = b0 & 0x0F;
        ops_alu::execute(self, address, word, group, variant, x, y, z, imm)
    }

    // --- Arithmetic primitives ----------------------------------------

    pub(crate) fn flag_set(&mut self, v: u16) {
        self.flags.set(Flags::ZERO, v == 0);
        self.flags.set(Flags::NEGATIVE, v >= 0x8000);
    }

    pub(crate) fn add16(&mut self, l: u16, r: u16) -> u16 {
        let sum = l as u32 + r as u32;
        let (result, carry) = if sum >= 0x10000 {
            (sum - 0x10000, true)
        } else {
            (sum, false)
        };
        self.flags.set(Flags::CARRY, carry);

        let both_negative = l >= 0x8000 && r >= 0x8000;
        let both_positive = l < 0x8000 && r < 0x8000;
        let overflow = (both_negative && result < 0x8000) || (both_positive && result >= 0x8000);
        self.flags.set(Flags::OVERFLOW, overflow);

        let result = result as u16;
        self.flag_set(result);
        result
    }

    pub(crate) fn sub16(&mut self, l: u16, r: u16) -> u16 {
        let result = self.add16(l, crate::utils::complement(r));
        self.flags.toggle(Flags::CARRY);
        if r == 0x8000 {
            self.flags.toggle(Flags::OVERFLOW);
        }
        result
    }

    pub(crate) fn and16(&mut self, l: u16, r: u16) -> u16 {
        let result = l & r;
        self.flag_set(result);
        result
    }

    pub(crate) fn or16(&mut self, l: u16, r: u16) -> u16 {
        let result = l | r;
        self.flag_set(result);
        result
    }

    pub(crate) fn xor16(&mut self, l: u16, r: u16) -> u16 {
        let result = l ^ r;
        self.flag_set(result);
        result
    }

    pub(crate) fn mul16(&mut self, l: u16, r: u16) -> u16 {
        let (mut l, mut r) = (crate::utils::to_dec(l), crate::utils::to_dec(r));
        if r < 0 {
            l = -l;
            r = -r;
        }
        let product = l as i64 * r as i64;
        self.flags.set(Flags::CARRY, product >= 0x10000);
        let result = (product & 0xFFFF) as u16;
        self.flag_set(result);
        result
    }

    pub(crate) fn div16(&mut self, l: u16, r: u16) -> u16 {
        let (l, r) = (crate::utils::to_dec(l), crate::utils::to_dec(r));
        let (quotient, remainder) = if r == 0 {
            (0, l)
        } else {
            (l / r, l % r)
        };
        self.flags.set(Flags::CARRY, remainder != 0);
        let result = crate::utils::to_hex(quotient);
        self.flag_set(result);
        result
    }

    /// Floor modulo: the remainder takes the sign of the divisor.
    pub(crate) fn mod16(&mut self, l: u16, r: u16) -> u16 {
        let (l, r) = (crate::utils::to_dec(l), crate::utils::to_dec(r));
        let remainder = if r == 0 {
            0
        } else {
            let rem = l % r;
            if rem != 0 && (rem < 0) != (r < 0) {
                rem + r
            } else {
                rem
            }
        };
        self.flags.set(Flags::CARRY, r == 0);
        let result = crate::utils::to_hex(remainder);
        self.flag_set(result);
        result
    }

    /// Truncating remainder: the remainder takes the sign of the
    /// dividend, matching Rust's and C's `%` operator.
    pub(crate) fn rem16(&mut self, l: u16, r: u16) -> u16 {
        let (l, r) = (crate::utils::to_dec(l), crate::utils::to_dec(r));
        let remainder = if r == 0 { 0 } else { l % r };
        self.flags.set(Flags::CARRY, r == 0);
        let result = crate::utils::to_hex(remainder);
        self.flag_set(result);
        result
    }
}

/// Check that the bytes named by `mask1`/`mask2`/`mask3` are all zero on
/// `b1`/`b2`/`b3` respectively. The caller pre-masks each operand byte to
/// only the bits it wants checked (e.g. `b1 & 0xF0` to check only the
/// high nibble), so this just compares against the full-byte mask
/// constants used throughout the dispatch table above.
fn require_zero(b1: u8, b2: u8, b3: u8, mask1: u8, mask2: u8, mask3: u8) -> bool {
    (b1 & mask1) == 0 && (b2 & mask2) == 0 && (b3 & mask3) == 0
}

fn is_alu_opcode(b0: u8) -> bool {
    matches!(b0 & 0xF0, 0x40..=0xA0) && b0 <= 0xA8
}
