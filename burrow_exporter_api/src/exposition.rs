use anyhow::{anyhow, Context};
use burrow_exporter::collector::{MetricDescriptor, MetricSample};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

/// Renders one collection pass in the Prometheus text format.
///
/// A fresh registry is built per scrape so series of groups that failed this pass disappear.
pub fn render_samples<'a>(
    descriptors: impl IntoIterator<Item = &'a MetricDescriptor>,
    samples: impl IntoIterator<Item = MetricSample>,
) -> Result<String, anyhow::Error> {
    let registry = Registry::new();
    let mut gauges = HashMap::new();

    for descriptor in descriptors {
        let gauge = GaugeVec::new(
            Opts::new(descriptor.name, descriptor.help),
            descriptor.label_names,
        )
        .with_context(|| format!("While creating gauge {}", descriptor.name))?;

        registry
            .register(Box::new(gauge.clone()))
            .with_context(|| format!("While registering gauge {}", descriptor.name))?;

        gauges.insert(descriptor.name, gauge);
    }

    for sample in samples {
        let gauge = gauges
            .get(sample.name())
            .ok_or_else(|| anyhow!("Metric {} wasn't described", sample.name()))?;

        gauge
            .get_metric_with_label_values(&sample.label_values())
            .with_context(|| format!("While setting value of {}", sample.name()))?
            .set(sample.value());
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("While encoding metrics")?;

    String::from_utf8(buffer).context("While converting encoded metrics to utf8")
}
