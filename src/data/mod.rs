/// Data layer: tables, ATAB loading and file resolution.
///
/// Architecture:
/// ```text
///  <input_dir>/<model>/<prefix><lt_range>_<param><postfix>
///        │
///        ▼
///   ┌──────────┐
///   │ filename  │  glob match + lead-time range token
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse ATAB file → header + Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform │  missing values, renames, derived columns
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolver  │  validate dates → ModelDataIndex
///   └──────────┘
/// ```

pub mod filename;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod transform;
