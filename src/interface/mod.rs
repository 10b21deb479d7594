//! The contracts between this crate and its collaborators: alphabets providing rankable symbols,
//! and membership oracles providing down-weighting decisions.

pub mod alphabet;
pub mod oracle;
