//! # quranic-lens
//!
//! Collocation, flow aggregation and layout engine for the Quranic Arabic
//! morphology corpus.
//!
//! A [`CorpusSnapshot`] holds an immutable, ordered token stream together
//! with its frequency tables and window index. On top of it:
//!
//! - [`engine`] answers collocation (PMI) queries over ayah, surah and
//!   distance windows, aggregates root → lemma flows, and memoizes results.
//! - [`layout`] turns those results into deterministic 2D geometry: radial
//!   ayah maps, collocation rings, force-directed graphs and Sankey bands.
//!
//! ```no_run
//! use quranic_lens::{CollocationOptions, CorpusSnapshot, QueryEngine, TermRef};
//!
//! let snapshot = CorpusSnapshot::load_json("tokens.json")?;
//! let results = QueryEngine::new().collocations(
//!     &snapshot,
//!     &TermRef::root("ك ت ب"),
//!     &CollocationOptions::default(),
//! )?;
//! for r in results.iter().take(10) {
//!     println!("{} pmi={:.2} count={}", r.label, r.pmi, r.count);
//! }
//! # Ok::<(), quranic_lens::LensError>(())
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod index;
pub mod layout;
pub mod types;

pub use config::{load_config, LensConfig};
pub use corpus::{load_tokens_json, CorpusSnapshot, Fingerprint};
pub use engine::{
    build_root_word_flows, get_collocations, get_pair_cooccurrence, normalize_arabic,
    scope_flows_to_sura, unique_roots, CollocationCache, CollocationOptions, CollocationResult,
    DistanceUnit, PairCooccurrence, QueryEngine, RootFlow, WindowType,
};
pub use index::{FrequencyTables, WindowIndex};
pub use layout::LayoutConfig;
pub use types::{
    AyahRef, LensError, LensResult, PartOfSpeech, TermKind, TermRef, Token, TokenBuilder,
};
