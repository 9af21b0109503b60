/// Data layer: core types, loading, normalisation and ranking.
///
/// Architecture:
/// ```text
///  .xlsx / .json / csv folder
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sheets → RawDataset (three labelled matrices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  HH:MM:SS → minutes, label check, flatten row-major
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  owns Arc<[CombinationRecord]> until reload/invalidate
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  rank     │  score vs. TargetProfile → top N ScoredCombination
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  top matches → CSV
///   └──────────┘
/// ```

pub mod cache;
pub mod export;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod rank;
