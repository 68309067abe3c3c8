//! A small assembler for chip16 source text: one mnemonic and its
//! operands per line, comments starting with `;`, blank lines ignored.
//!
//! Grounded in the teacher's `asm.rs`/`asm_to_tokens.rs`: a lexing pass
//! followed by signature-based instruction matching, with a
//! colored, context-carrying rendering for the error the caller shows a
//! human. Unlike the teacher's assembler, this one drops `LabelTable` —
//! chip16 source has no forward label references to resolve, every
//! operand is either a register or a literal, so there's nothing for a
//! label pass to do.

mod operand;
mod table;

#[cfg(test)]
mod test;

use colored::Colorize;

use crate::error::Chip16Error;
use table::{candidates, encode, match_shape};

/// Assemble a complete source file into a flat stream of 4-byte
/// instructions, ready to be used as ROM payload bytes.
pub fn assemble(source: &str) -> Result<Vec<u8>, Chip16Error> {
    let mut output = Vec::new();
    for (line_no, raw_line) in source.lines().enumerate() {
        let (mnemonic, operands) = tokenize_line(raw_line);
        if mnemonic.is_empty() {
            continue;
        }
        output.extend_from_slice(&assemble_line(line_no + 1, &mnemonic, &operands)?);
    }
    Ok(output)
}

/// Assemble a single already-tokenized line into its 4-byte encoding.
fn assemble_line(line: usize, mnemonic: &str, operands: &[String]) -> Result<[u8; 4], Chip16Error> {
    let candidates = candidates(mnemonic).ok_or_else(|| Chip16Error::UnknownMnemonic {
        line,
        mnemonic: mnemonic.to_string(),
    })?;

    for candidate in candidates {
        if let Some(parsed) = match_shape(candidate.shape, operands) {
            return Ok(encode(candidate.shape, candidate.opcode, &parsed));
        }
    }

    Err(Chip16Error::SignatureMismatch {
        line,
        mnemonic: mnemonic.to_string(),
        tokens: operands.to_vec(),
    })
}

/// Strip a `;` comment, uppercase, and split into a mnemonic and its
/// operand tokens (separated by any run of whitespace and/or commas).
/// Returns an empty mnemonic for a blank or comment-only line.
fn tokenize_line(raw_line: &str) -> (String, Vec<String>) {
    let without_comment = match raw_line.find(';') {
        Some(idx) => &raw_line[..idx],
        None => raw_line,
    };
    let upper = without_comment.to_uppercase();

    // Operands may be separated by whitespace and/or commas (spec.md
    // §6), so tokens are extracted by splitting on anything that isn't
    // part of a `[-\w]+` run rather than assuming one fixed delimiter.
    let mut tokens = upper
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let mnemonic = tokens.next().unwrap_or_default();
    let operands = tokens.collect();
    (mnemonic, operands)
}

/// Render a `source`-relative assembler error the way the teacher's
/// `ParseError::nice_message` does: the offending line, a line-number
/// gutter, and the message in red underneath.
pub fn render_error(source: &str, err: &Chip16Error) -> String {
    let line_no = match err {
        Chip16Error::SignatureMismatch { line, .. }
        | Chip16Error::UnknownMnemonic { line, .. }
        | Chip16Error::InvalidOperand { line, .. } => *line,
        _ => return err.to_string(),
    };

    let context = source.lines().nth(line_no.saturating_sub(1)).unwrap_or("");
    format!(
        "{}\n {} {}\n {}\n{}",
        format!("error: {err}").red().bold(),
        format!("{line_no} |").dimmed(),
        context,
        " ".repeat(format!("{line_no} |").len()).dimmed(),
        "^ here".red(),
    )
}
