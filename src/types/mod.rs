//! Core data types: tokens, term references and errors.

pub mod error;
pub mod term;
pub mod token;

pub use error::{LensError, LensResult};
pub use term::{TermKind, TermRef};
pub use token::{AyahRef, Morphology, PartOfSpeech, Token, TokenBuilder};
