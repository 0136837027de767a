//! glyphscan region - connected regions of a binary page
//!
//! - **Seed fill** ([`seedfill`]) - Explicit-stack flood fill, hole counting
//! - **Connected components** ([`conncomp`]) - Row-major component discovery
//! - **Region finder** ([`regions`]) - Text regions of the dilated page,
//!   with ruled-line removal
//!
//! # Examples
//!
//! ```
//! use glyphscan_core::BitGrid;
//! use glyphscan_region::{ConnectivityType, flood_fill};
//!
//! let grid = BitGrid::from_rows(&["##.", "..#"]).unwrap();
//! let mut visited = BitGrid::new(3, 2);
//! let cells = flood_fill(&grid, &mut visited, 0, 0, ConnectivityType::EightWay).unwrap();
//! assert_eq!(cells.len(), 3);
//! ```

pub mod conncomp;
pub mod error;
pub mod regions;
pub mod seedfill;

pub use glyphscan_core;

pub use error::{RegionError, RegionResult};

pub use conncomp::{ConnectedComponent, ConnectivityType, find_connected_components};
pub use regions::{
    LONG_LINE_MAX_THICKNESS, LONG_LINE_SPAN_RATIO, RegionOptions, find_regions, is_long_line,
};
pub use seedfill::{count_enclosures, flood_fill};
