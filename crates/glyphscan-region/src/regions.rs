//! Region finder
//!
//! Runs over the dilated page, where the glyphs of a word or line have
//! been glued into one blob, and reports the bounding rectangle of each
//! 8-connected blob. Long thin blobs (rules, borders, underlines) can be
//! dropped before they reach segmentation.

use glyphscan_core::{BitGrid, Rect};

use crate::conncomp::{ConnectivityType, find_connected_components};
use crate::error::{RegionError, RegionResult};

/// A blob counts as a line when it spans at least this fraction of the
/// page along its long side
pub const LONG_LINE_SPAN_RATIO: f64 = 0.5;

/// Largest stroke thickness, before dilation, still treated as a line
pub const LONG_LINE_MAX_THICKNESS: i32 = 4;

/// Options for region finding
#[derive(Debug, Clone)]
pub struct RegionOptions {
    /// Drop blobs that look like ruled lines
    pub exclude_long_lines: bool,
    /// Kernel size the grid was dilated with
    pub kernel_size: u32,
    /// Neighborhood for blob discovery
    pub connectivity: ConnectivityType,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            exclude_long_lines: true,
            kernel_size: 1,
            connectivity: ConnectivityType::EightWay,
        }
    }
}

impl RegionOptions {
    /// Set whether long lines are dropped
    pub fn with_exclude_long_lines(mut self, exclude: bool) -> Self {
        self.exclude_long_lines = exclude;
        self
    }

    /// Set the dilation kernel size used to build the grid
    pub fn with_kernel_size(mut self, size: u32) -> Self {
        self.kernel_size = size;
        self
    }

    /// Set the connectivity
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> RegionResult<()> {
        if self.kernel_size == 0 {
            return Err(RegionError::InvalidParameters(
                "kernel_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check if a region of the dilated page is a ruled line
///
/// The region must span at least [`LONG_LINE_SPAN_RATIO`] of the page
/// along its long side, and its thickness with the dilation growth
/// removed must not exceed [`LONG_LINE_MAX_THICKNESS`].
pub fn is_long_line(region: &Rect, page_cols: u32, page_rows: u32, kernel_size: u32) -> bool {
    let growth = kernel_size.saturating_sub(1) as i32;
    let horizontal = region.w >= region.h;
    let (long, short, extent) = if horizontal {
        (region.w, region.h, page_cols)
    } else {
        (region.h, region.w, page_rows)
    };
    let spans = long as f64 >= extent as f64 * LONG_LINE_SPAN_RATIO;
    let thickness = (short - growth).max(1);
    spans && thickness <= LONG_LINE_MAX_THICKNESS
}

/// Find the text regions of a dilated page
///
/// # Arguments
///
/// * `dilated` - Binarized page after dilation
/// * `options` - Region options
///
/// # Returns
///
/// Region rectangles in row-major discovery order.
///
/// # Errors
///
/// Returns an error if the options are invalid.
pub fn find_regions(dilated: &BitGrid, options: &RegionOptions) -> RegionResult<Vec<Rect>> {
    options.validate()?;
    let components = find_connected_components(dilated, options.connectivity)?;
    let total = components.len();

    let regions: Vec<Rect> = components
        .into_iter()
        .map(|c| c.bounds)
        .filter(|r| {
            let line = options.exclude_long_lines
                && is_long_line(r, dilated.cols(), dilated.rows(), options.kernel_size);
            if line {
                log::trace!("dropping long line region {:?}", r);
            }
            !line
        })
        .collect();

    log::debug!(
        "find_regions: {} blobs, {} regions kept",
        total,
        regions.len()
    );
    Ok(regions)
}
