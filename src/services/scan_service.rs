use std::sync::{Arc, Mutex};

use crate::api::{Provider, ProviderError, METRIC_NETWORK_IN, METRIC_NETWORK_OUT};
use crate::models::{Instance, ScanPhase, ScanState};

/// Walk the whole account: every region in enumeration order, every
/// instance in listing order, two metric sums per instance. The result
/// is accumulated privately and returned in one piece; callers commit it
/// (or nothing) to view state. `progress` fires at each phase change.
///
/// Any inventory error aborts the walk and discards everything collected
/// so far. Metric errors never abort; the affected counter reads zero.
pub async fn run_scan(
    provider: &dyn Provider,
    progress: &mut (dyn FnMut(&ScanPhase) + Send),
) -> Result<Vec<Instance>, ProviderError> {
    progress(&ScanPhase::Enumerating);
    let regions = provider.list_regions().await?;
    tracing::info!(count = regions.len(), "Enumerated regions");

    let mut all_instances = Vec::new();
    for region in &regions {
        progress(&ScanPhase::Scanning(region.clone()));
        let mut instances = provider.list_instances(region).await?;
        for instance in &mut instances {
            instance.network_in_bytes =
                metric_or_zero(provider, region, instance, METRIC_NETWORK_IN).await;
            instance.network_out_bytes =
                metric_or_zero(provider, region, instance, METRIC_NETWORK_OUT).await;
        }
        tracing::info!(region = %region, count = instances.len(), "Collected region");
        all_instances.extend(instances);
    }
    Ok(all_instances)
}

async fn metric_or_zero(
    provider: &dyn Provider,
    region: &str,
    instance: &Instance,
    metric: &str,
) -> f64 {
    match provider
        .metric_sum(region, &instance.id, metric, instance.launch_time)
        .await
    {
        Ok(sum) => sum,
        Err(e) => {
            tracing::warn!(error = %e, "Metric fetch failed; substituting zero");
            0.0
        }
    }
}

/// Drive a scan against shared view state: phase checkpoints update the
/// status line, the instance list is committed once at the end. This is
/// the one task that mutates `scan`; the lock is never held across an
/// await.
pub async fn run_scan_into_state(provider: Arc<dyn Provider>, scan: Arc<Mutex<ScanState>>) {
    let mut progress = |phase: &ScanPhase| {
        scan.lock().unwrap().phase = phase.clone();
    };
    let result = run_scan(provider.as_ref(), &mut progress).await;
    match result {
        Ok(instances) => scan.lock().unwrap().complete(instances),
        Err(e) => {
            tracing::error!(error = %e, "Scan aborted");
            scan.lock().unwrap().fail();
        }
    }
}
