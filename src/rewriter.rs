use crate::{
    error::Result,
    mnemonic::{InstructionClass, Mnemonic},
    register::{Family, Register, Width},
};
use std::ops::Range;
use tracing::{debug, trace};

/// Lines longer than this, newline included, are copied without being looked at.
pub const MAX_LINE_LEN: usize = 64;
pub const MAX_MNEMONIC_LEN: usize = 8;
pub const MAX_OPERAND_LEN: usize = 31;

/// Why a line was copied unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Passthrough {
    NotInstruction,
    Oversized,
    TokenOverflow,
    UnknownMnemonic,
    CompareImmediate,
    IneligibleSource,
    IneligibleDestination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Register(Register),
    Immediate(&'a [u8]),
    /// Unary instructions have no source operand.
    Implied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    pub mnemonic: Mnemonic,
    pub source: Operand<'a>,
    pub destination: Register,
    /// Byte range of the destination register within the line.
    pub destination_span: Range<usize>,
}

impl<'a> Rewrite<'a> {
    pub fn width(&self) -> Width {
        self.mnemonic.class().width()
    }

    /// The register the destination is exchanged with for the duration of
    /// the instruction.
    pub fn via(&self) -> Register {
        match self.source {
            Operand::Register(reg) => reg,
            Operand::Immediate(_) | Operand::Implied => self.width().accumulator(),
        }
    }

    /// Renders the exchange-wrapped replacement, three newline-terminated lines.
    pub fn render(&self) -> Vec<u8> {
        let via = self.via().name();
        let destination = self.destination.name();
        let exchange = format!("\txchg{}\t{destination}, {via}\n", self.width().suffix());

        let mut out = Vec::with_capacity(exchange.len() * 3);
        out.extend_from_slice(exchange.as_bytes());

        out.push(b'\t');
        out.extend_from_slice(self.mnemonic.name().as_bytes());
        out.push(b'\t');
        match self.source {
            Operand::Register(_) => {
                out.extend_from_slice(destination.as_bytes());
                out.extend_from_slice(b", ");
            }
            Operand::Immediate(value) => {
                out.extend_from_slice(value);
                out.extend_from_slice(b", ");
            }
            Operand::Implied => {}
        }
        out.extend_from_slice(via.as_bytes());
        out.push(b'\n');

        out.extend_from_slice(exchange.as_bytes());
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    Rewritten(Rewrite<'a>),
    Verbatim(Passthrough),
}

/// Splits `text` at the first `delimiter`, which must occur within `bound`
/// bytes. The delimiter itself is dropped.
fn split_token(
    text: &[u8],
    delimiter: u8,
    bound: usize,
    missing: Passthrough,
) -> std::result::Result<(&[u8], &[u8]), Passthrough> {
    match text.iter().take(bound + 1).position(|&b| b == delimiter) {
        Some(at) => Ok((&text[..at], &text[at + 1..])),
        None if text.len() > bound => Err(Passthrough::TokenOverflow),
        None => Err(missing),
    }
}

/// Decides whether `line` is rewritten, without producing any output.
pub fn parse(line: &[u8]) -> std::result::Result<Rewrite<'_>, Passthrough> {
    if line.len() > MAX_LINE_LEN {
        return Err(Passthrough::Oversized);
    }

    let body = line.strip_suffix(b"\n").unwrap_or(line);
    let rest = body
        .strip_prefix(b"\t")
        .ok_or(Passthrough::NotInstruction)?;

    let (name, rest) = split_token(
        rest,
        b'\t',
        MAX_MNEMONIC_LEN,
        Passthrough::UnknownMnemonic,
    )?;
    let mnemonic = Mnemonic::classify(name).ok_or(Passthrough::UnknownMnemonic)?;

    let (width, source, rest) = match mnemonic.class() {
        InstructionClass::Unary(width) => (width, Operand::Implied, rest),
        InstructionClass::Binary(width) => {
            if !matches!(rest.first(), Some(b'%' | b'$')) {
                return Err(Passthrough::IneligibleSource);
            }

            let (token, rest) = split_token(
                rest,
                b',',
                MAX_OPERAND_LEN,
                Passthrough::IneligibleSource,
            )?;

            let source = if token[0] == b'$' {
                if mnemonic.is_compare() {
                    return Err(Passthrough::CompareImmediate);
                }
                Operand::Immediate(token)
            } else {
                Register::classify(token, width, Family::Accumulator)
                    .map(Operand::Register)
                    .ok_or(Passthrough::IneligibleSource)?
            };

            (width, source, rest.strip_prefix(b" ").unwrap_or(rest))
        }
    };

    if rest.first() != Some(&b'%') {
        return Err(Passthrough::IneligibleDestination);
    }
    if rest.len() > MAX_OPERAND_LEN {
        return Err(Passthrough::TokenOverflow);
    }
    let destination = Register::classify(rest, width, Family::Target)
        .ok_or(Passthrough::IneligibleDestination)?;

    let start = body.len() - rest.len();
    Ok(Rewrite {
        mnemonic,
        source,
        destination,
        destination_span: start..body.len(),
    })
}

/// Appends either `line` itself or its replacement to `out`.
pub fn rewrite_line<'a>(line: &'a [u8], out: &mut Vec<u8>) -> Result<Outcome<'a>> {
    match parse(line) {
        Ok(rewrite) => {
            let replacement = rewrite.render();
            debug!(
                mnemonic = %rewrite.mnemonic,
                destination = %rewrite.destination,
                via = %rewrite.via(),
                "rewriting through exchange"
            );

            out.try_reserve(replacement.len())?;
            out.extend_from_slice(&replacement);
            Ok(Outcome::Rewritten(rewrite))
        }
        Err(reason) => {
            trace!(?reason, line = ?String::from_utf8_lossy(line), "copying verbatim");

            out.try_reserve(line.len())?;
            out.extend_from_slice(line);
            Ok(Outcome::Verbatim(reason))
        }
    }
}
