use crate::{register::Width, token::lex_exact};
use logos::Logos;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionClass {
    Binary(Width),
    Unary(Width),
}

impl InstructionClass {
    pub fn width(&self) -> Width {
        match self {
            InstructionClass::Binary(w) | InstructionClass::Unary(w) => *w,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    #[token("movq")]
    Movq,
    #[token("addq")]
    Addq,
    #[token("subq")]
    Subq,
    #[token("cmpq")]
    Cmpq,
    #[token("xorq")]
    Xorq,
    #[token("andq")]
    Andq,
    #[token("testq")]
    Testq,
    #[token("orq")]
    Orq,
    #[token("adcq")]
    Adcq,
    #[token("sbbq")]
    Sbbq,

    #[token("incq")]
    Incq,
    #[token("rolq")]
    Rolq,

    #[token("movl")]
    Movl,
    #[token("addl")]
    Addl,
    #[token("subl")]
    Subl,
    #[token("cmpl")]
    Cmpl,
    #[token("xorl")]
    Xorl,
    #[token("andl")]
    Andl,
    #[token("testl")]
    Testl,
    #[token("orl")]
    Orl,
    #[token("adcl")]
    Adcl,
    #[token("sbbl")]
    Sbbl,
    #[token("cmovle")]
    Cmovle,

    #[token("incl")]
    Incl,
    #[token("roll")]
    Roll,
}

impl Mnemonic {
    /// Looks up a mnemonic by its exact spelling.
    pub fn classify(token: &[u8]) -> Option<Mnemonic> {
        lex_exact(token)
    }

    pub fn class(&self) -> InstructionClass {
        use Mnemonic::*;

        match self {
            Movq | Addq | Subq | Cmpq | Xorq | Andq | Testq | Orq | Adcq | Sbbq => {
                InstructionClass::Binary(Width::Quad)
            }
            Incq | Rolq => InstructionClass::Unary(Width::Quad),
            Movl | Addl | Subl | Cmpl | Xorl | Andl | Testl | Orl | Adcl | Sbbl | Cmovle => {
                InstructionClass::Binary(Width::Long)
            }
            Incl | Roll => InstructionClass::Unary(Width::Long),
        }
    }

    pub fn is_compare(&self) -> bool {
        self.name().starts_with("cmp")
    }

    pub fn name(&self) -> &'static str {
        use Mnemonic::*;

        match self {
            Movq => "movq",
            Addq => "addq",
            Subq => "subq",
            Cmpq => "cmpq",
            Xorq => "xorq",
            Andq => "andq",
            Testq => "testq",
            Orq => "orq",
            Adcq => "adcq",
            Sbbq => "sbbq",
            Incq => "incq",
            Rolq => "rolq",
            Movl => "movl",
            Addl => "addl",
            Subl => "subl",
            Cmpl => "cmpl",
            Xorl => "xorl",
            Andl => "andl",
            Testl => "testl",
            Orl => "orl",
            Adcl => "adcl",
            Sbbl => "sbbl",
            Cmovle => "cmovle",
            Incl => "incl",
            Roll => "roll",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
