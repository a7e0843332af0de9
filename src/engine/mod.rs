//! Query engine: normalization, flow aggregation, windowing, collocation and caching.

pub mod cache;
pub mod collocation;
pub mod flows;
pub mod normalize;
pub mod query;
pub mod window;

pub use cache::{CollocationCache, CollocationKey};
pub use collocation::{
    collocations_with_index, get_collocations, get_pair_cooccurrence,
    pair_cooccurrence_with_index, CollocationOptions, CollocationResult, PairCooccurrence,
};
pub use flows::{build_root_word_flows, scope_flows_to_sura, unique_roots, RootFlow};
pub use normalize::{collate, collation_key, normalize_arabic};
pub use query::QueryEngine;
pub use window::{DistanceUnit, Window, WindowType};
