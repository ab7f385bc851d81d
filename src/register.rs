use crate::token::lex_exact;
use logos::Logos;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Quad,
    Long,
}

impl Width {
    /// Operand-size suffix used on the exchange instruction.
    pub fn suffix(&self) -> char {
        match self {
            Width::Quad => 'q',
            Width::Long => 'l',
        }
    }

    pub fn accumulator(&self) -> Register {
        match self {
            Width::Quad => Register::Rax,
            Width::Long => Register::Eax,
        }
    }
}

/// Which side of a rewrite a register is checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Accumulator,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    AccumulatorPrimary,
    AccumulatorSecondary,
    TargetPrimary,
    TargetSecondary,
}

impl Role {
    pub fn family(&self) -> Family {
        match self {
            Role::AccumulatorPrimary | Role::AccumulatorSecondary => Family::Accumulator,
            Role::TargetPrimary | Role::TargetSecondary => Family::Target,
        }
    }
}

/// The only registers a rewrite ever reads or emits.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    #[token("%rax")]
    Rax,
    #[token("%r8")]
    R8,
    #[token("%rbx")]
    Rbx,
    #[token("%r11")]
    R11,

    #[token("%eax")]
    Eax,
    #[token("%r8d")]
    R8d,
    #[token("%ebx")]
    Ebx,
    #[token("%r11d")]
    R11d,
}

impl Register {
    /// Matches `token` against the registers of `width` in `family`.
    pub fn classify(token: &[u8], width: Width, family: Family) -> Option<Register> {
        lex_exact::<Register>(token)
            .filter(|reg| reg.width() == width && reg.role().family() == family)
    }

    pub fn width(&self) -> Width {
        use Register::*;

        match self {
            Rax | R8 | Rbx | R11 => Width::Quad,
            Eax | R8d | Ebx | R11d => Width::Long,
        }
    }

    pub fn role(&self) -> Role {
        use Register::*;

        match self {
            Rax | Eax => Role::AccumulatorPrimary,
            R8 | R8d => Role::AccumulatorSecondary,
            Rbx | Ebx => Role::TargetPrimary,
            R11 | R11d => Role::TargetSecondary,
        }
    }

    pub fn name(&self) -> &'static str {
        use Register::*;

        match self {
            Rax => "%rax",
            R8 => "%r8",
            Rbx => "%rbx",
            R11 => "%r11",
            Eax => "%eax",
            R8d => "%r8d",
            Ebx => "%ebx",
            R11d => "%r11d",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
