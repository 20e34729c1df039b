//! # Shared aggregator
//!
//! Two routes feed one aggregator:
//! - `requests` and `requests_total` both land in the same counter
//! - `latency` goes through a shutdown hook that flushes a summary
//!
//! The aggregator is torn down only when the selector lets go of its last route.
//!
//! Run with `RUST_LOG=debug cargo run --example shared_aggregator`.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use meterline::{
    CallbackInput, Component, Input, InputFn, InputRef, MetricReport, MetricValue, PipelineError,
    Selector,
};
use tracing_subscriber::EnvFilter;

fn counter(total: Arc<AtomicI64>) -> InputRef {
    InputFn::arc("counter", move |report: MetricReport| {
        let total = total.clone();
        async move {
            match report.value {
                MetricValue::Int(v) => {
                    total.fetch_add(v, Ordering::Relaxed);
                    Ok(())
                }
                MetricValue::Double(_) => Err(PipelineError::failed("counter: expected int")),
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let total = Arc::new(AtomicI64::new(0));
    let shared = counter(total.clone());

    let latency_sum = Arc::new(AtomicI64::new(0));
    let sum = latency_sum.clone();
    let latency: InputRef = CallbackInput::arc(counter(latency_sum.clone()), move || {
        let sum = sum.clone();
        async move {
            println!("latency total at shutdown: {}ms", sum.load(Ordering::Relaxed));
            Ok(())
        }
    });

    let selector = Selector::new([
        ("requests", shared.clone()),
        ("requests_total", shared),
        ("latency", latency),
    ]);
    selector.acquire();
    println!("routes: {:?}", selector.routes());

    for (name, value) in [("requests", 3), ("requests_total", 2), ("latency", 120)] {
        selector
            .add_report(MetricReport::new(name, MetricValue::Int(value)))
            .await?;
    }

    if let Err(err) = selector
        .add_report(MetricReport::new("disk", MetricValue::Int(1)))
        .await
    {
        println!("rejected: {err}");
    }

    selector.release().await?;
    println!("requests counted: {}", total.load(Ordering::Relaxed));
    Ok(())
}
