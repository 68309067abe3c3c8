//! Small helpers shared by the cpu test module, in the spirit of the
//! teacher's `test_helpers.rs`: build a raw instruction stream, run it to
//! completion, and assert on the resulting register/flag state without
//! repeating the same boilerplate in every test.

use super::{Cpu, NullPort, VideoAudioPort};

/// A `VideoAudioPort` that records every call it receives, so tests can
/// assert the CPU forwarded the right effect without standing up a real
/// framebuffer or audio device.
#[derive(Default)]
pub struct RecordingPort {
    pub tones_played: Vec<(u8, u16)>,
    pub tones_stopped: Vec<u8>,
    pub sprites_drawn: Vec<(i16, i16, u16)>,
    pub tone_envelopes: Vec<u8>,
}

impl VideoAudioPort for RecordingPort {
    fn play_tone(&mut self, channel: u8, frequency: u16) {
        self.tones_played.push((channel, frequency));
    }

    fn stop_tone(&mut self, channel: u8) {
        self.tones_stopped.push(channel);
    }

    fn draw_sprite(&mut self, x: i16, y: i16, sprite_address: u16) {
        self.sprites_drawn.push((x, y, sprite_address));
    }

    fn set_tone_envelope(&mut self, envelope: u8) {
        self.tone_envelopes.push(envelope);
    }
}

/// Assemble a handful of raw 4-byte instructions into one program. Each
/// element is `[opcode, yx, ll, hh]`, matching the wire format directly
/// so tests can pin exact byte patterns without depending on the
/// assembler.
pub fn program(instructions: &[[u8; 4]]) -> Vec<u8> {
    instructions.iter().flatten().copied().collect()
}

/// Load `bytes` at address 0 and single-step until the program counter
/// runs off the end of it.
pub fn run(bytes: &[u8]) -> Cpu<NullPort> {
    run_with_registers(bytes, &[])
}

/// Like `run`, but seeds registers directly before execution. Since every
/// immediate operand in this instruction set is itself read through
/// memory rather than used as a literal, a test program can't load a
/// known register value with a single instruction the way `ADDI Rx,#N`
/// would suggest — seeding the register file up front is the test-only
/// equivalent of the data a real ROM would keep in memory and reference
/// by address.
pub fn run_with_registers(bytes: &[u8], initial: &[(usize, u16)]) -> Cpu<NullPort> {
    let mut cpu = Cpu::new();
    for &(reg, value) in initial {
        cpu.registers[reg] = value;
    }
    cpu.load_rom(bytes, 0);
    while (cpu.pc as usize) < bytes.len() {
        cpu.step().expect("program should only contain valid opcodes");
    }
    cpu
}

macro_rules! assert_register {
    ($cpu:expr, $reg:expr, $value:expr) => {
        assert_eq!($cpu.registers[$reg], $value, "r{}", $reg);
    };
}

macro_rules! assert_flags {
    ($cpu:expr, $flags:expr) => {
        assert_eq!($cpu.flags, $flags);
    };
}

pub(crate) use assert_flags;
pub(crate) use assert_register;
