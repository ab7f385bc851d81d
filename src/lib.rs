pub mod driver;
pub mod error;
pub mod mnemonic;
pub mod register;
pub mod report;
pub mod rewriter;
mod token;
