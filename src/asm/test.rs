use pretty_assertions::assert_eq;

use super::assemble;
use crate::error::Chip16Error;

#[test]
fn add_immediate_encodes_reg_then_word_little_endian() {
    let bytes = assemble("ADDI R3, 0x1234").unwrap();
    assert_eq!(bytes, vec![0x40, 0x03, 0x34, 0x12]);
}

#[test]
fn add_register_register_packs_y_then_x() {
    let bytes = assemble("ADD R1, R2").unwrap();
    assert_eq!(bytes, vec![0x41, 0x21, 0x00, 0x00]);
}

#[test]
fn add_ternary_packs_z_in_the_low_nibble_of_b2() {
    let bytes = assemble("ADD R1, R2, R3").unwrap();
    assert_eq!(bytes, vec![0x42, 0x21, 0x03, 0x00]);
}

#[test]
fn registers_above_r9_parse_as_hex_digits() {
    let bytes = assemble("MOV RA, RF").unwrap();
    assert_eq!(bytes, vec![0x24, 0xFA, 0x00, 0x00]);
}

#[test]
fn ldi_reg_and_ldi_sp_pick_different_opcodes() {
    assert_eq!(assemble("LDI R0, 0x00F0").unwrap(), vec![0x20, 0x00, 0xF0, 0x00]);
    assert_eq!(assemble("LDI SP, 0xFE00").unwrap(), vec![0x21, 0x00, 0x00, 0xFE]);
}

#[test]
fn operands_separated_by_whitespace_alone_parse_the_same_as_commas() {
    let bytes = assemble("DRW r1 r2 0x3456").unwrap();
    assert_eq!(bytes, vec![0x05, 0x21, 0x56, 0x34]);
}

#[test]
fn drw_prefers_the_register_form_when_the_third_operand_is_a_register() {
    let bytes = assemble("DRW R0, R1, R2").unwrap();
    assert_eq!(bytes[0], 0x06);
}

#[test]
fn drw_falls_back_to_the_word_form_when_the_third_operand_is_a_literal() {
    let bytes = assemble("DRW R0, R1, 0x0100").unwrap();
    assert_eq!(bytes[0], 0x05);
}

#[test]
fn flip_packs_both_bits_into_the_low_two_bits_of_b3() {
    assert_eq!(assemble("FLIP 1, 0").unwrap(), vec![0x08, 0x00, 0x00, 0x02]);
    assert_eq!(assemble("FLIP 0, 1").unwrap(), vec![0x08, 0x00, 0x00, 0x01]);
    assert_eq!(assemble("FLIP 1, 1").unwrap(), vec![0x08, 0x00, 0x00, 0x03]);
}

#[test]
fn sal_and_shl_nibble_forms_emit_identical_bytes() {
    assert_eq!(assemble("SHL R0, 4").unwrap(), assemble("SAL R0, 4").unwrap());
}

#[test]
fn sal_and_shl_register_forms_use_different_opcodes() {
    let shl = assemble("SHL R0, R1").unwrap();
    let sal = assemble("SAL R0, R1").unwrap();
    assert_ne!(shl[0], sal[0]);
    assert_eq!(shl[0], 0xB2);
    assert_eq!(sal[0], 0xB4);
}

#[test]
fn sng_requires_a_byte_not_a_register_in_the_first_slot() {
    // A register first operand accidentally satisfies SNG's dead first
    // candidate (shared shape with SNP), producing SNP's opcode. This is
    // preserved rather than patched, since it's the source's own
    // documented quirk.
    let bytes = assemble("SNG R3, 0x1234").unwrap();
    assert_eq!(bytes[0], 0x0D);

    let bytes = assemble("SNG 3, 0x1234").unwrap();
    assert_eq!(bytes[0], 0x0E);
}

#[test]
fn spr_and_snd1_snd2_take_a_single_word_operand() {
    assert_eq!(assemble("SPR 0x0804").unwrap(), vec![0x04, 0x00, 0x04, 0x08]);
    assert_eq!(assemble("SND1 0x1234").unwrap(), vec![0x0A, 0x00, 0x34, 0x12]);
    assert_eq!(assemble("SND2 0x1234").unwrap(), vec![0x0B, 0x00, 0x34, 0x12]);
}

#[test]
fn blank_lines_and_comments_are_skipped() {
    let bytes = assemble("; a comment\n\nNOP ; trailing comment\n").unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn unknown_mnemonic_reports_the_line_number() {
    let err = assemble("NOP\nFROB R0\n").unwrap_err();
    assert!(matches!(
        err,
        Chip16Error::UnknownMnemonic { line: 2, .. }
    ));
}

#[test]
fn signature_mismatch_when_no_candidate_fits() {
    let err = assemble("ADD R0").unwrap_err();
    assert!(matches!(err, Chip16Error::SignatureMismatch { line: 1, .. }));
}

#[test]
fn shift_amount_out_of_nibble_range_is_rejected() {
    let err = assemble("SHL R0, 16").unwrap_err();
    assert!(matches!(err, Chip16Error::SignatureMismatch { .. }));
}

#[test]
fn assembling_a_short_call_ret_program() {
    let bytes = assemble("CALL 0x0010\nRET\n").unwrap();
    assert_eq!(bytes, vec![0x14, 0x00, 0x10, 0x00, 0x15, 0x00, 0x00, 0x00]);
}

#[test]
fn render_error_includes_the_offending_line_text() {
    let source = "NOP\nFROB R0\n";
    let err = assemble(source).unwrap_err();
    let rendered = super::render_error(source, &err);
    assert!(rendered.contains("FROB R0"));
}
