// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scanning and aggregation
//!
//! [`Scanner`] walks a scene and writes per-part measurements into a
//! [`MetadataStore`]; [`aggregate_all`] sums the stored values by material
//! category across every loaded model.

pub mod aggregate;
pub mod report;
pub mod scanner;
pub mod store;

pub use aggregate::{
    aggregate_all, CollectingPresenter, FormattedTotal, MaterialReport, MaterialTotal,
    MaterialTotals, ResultsPresenter,
};
pub use report::{ModelReport, PartEntry, ScanReport};
pub use scanner::Scanner;
pub use store::{GroupMetadata, MetadataStore, PartMetadata};
