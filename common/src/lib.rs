//! API Forge Common Library
//!
//! Web(WASM)フロントエンドと共有される型とユーティリティ

pub mod cache;
pub mod defaults;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod formatter;
pub mod types;

pub use cache::{CacheDecision, CacheSnapshot, CACHE_KEY};
pub use defaults::{defaults_for, FormDefaults};
pub use error::{Error, Result};
pub use export::{export_file_name, results_to_csv, results_to_json};
pub use filter::{is_visible, search_haystack, visible_count, StatusFilter};
pub use form::{baseline_block, build_config, populate_from_config, FormState};
pub use formatter::{format_payload, pretty_or_raw, reindent_xml, Formatted};
pub use types::{
    ApiSide, BaselineBlock, BaselineOperation, BaselineRunInfo, ComparisonMode, ConfigDocument,
    EndpointConfig, EndpointPair, HeaderRow, Operation, ResultRecord, ResultStatus, RunConfig,
    TestType, TokenRow,
};
