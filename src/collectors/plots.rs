//! Harvester Plot File Metrics Collector
//!
//! The harvester's own view of its plot directories.
//!
//! # Metrics Produced
//! - `chia_plots_failed_to_open` - Plot files that failed to open
//! - `chia_plots_not_found` - Plot files that were not found
//! - `chia_plots` - Plot files currently loaded

use super::{collect_with_handler, CollectionContext, CollectionStatus};
use crate::chia::types::PlotFiles;
use crate::metrics::{self, MetricSink, Sample};

pub fn plot_file_samples(plots: &PlotFiles) -> Vec<Sample> {
    vec![
        Sample::unlabeled(
            &metrics::PLOTS_FAILED_TO_OPEN,
            plots.failed_to_open_filenames.len() as f64,
        ),
        Sample::unlabeled(
            &metrics::PLOTS_NOT_FOUND,
            plots.not_found_filenames.len() as f64,
        ),
        Sample::unlabeled(&metrics::PLOTS, plots.plots.len() as f64),
    ]
}

/// Collects plot file metrics from the harvester
pub async fn collect_plot_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    collect_with_handler(
        "plots",
        ctx.client.get_plots(ctx.endpoint),
        sink,
        |plots| plot_file_samples(&plots),
    )
    .await
}
