#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared aggregation pipeline for every dashboard panel.
//!
//! Each view (timeline chart, summary cards, utilization pie, trend
//! graph) calls into this one crate with different parameters instead of
//! re-implementing its own reduction, so chart and card totals cannot
//! drift. Every function here is a pure, total transform over fetched
//! snapshots: no clock, no network, no shared state.

pub mod summary;
pub mod timeline;
pub mod trend;
pub mod utilization;

pub use summary::{summarize, tally_by};
pub use timeline::{bucket_by_period, build_timeline, collapse_for_display, timeline_stats};
pub use trend::metric_trend;
pub use utilization::{percent_utilized, utilization_by_district};
