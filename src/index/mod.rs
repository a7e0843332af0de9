//! Index structures derived from a token snapshot. Each is rebuilt from scratch when the snapshot changes.

pub mod frequency;
pub mod window_index;

pub use frequency::{FrequencyTables, TermStats};
pub use window_index::{AyahSpan, SuraSpan, WindowIndex};
