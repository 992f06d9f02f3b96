use std::sync::Arc;
use std::time::Duration;

use stagescope::config::{init_tracing, TelemetryConfig};
use stagescope::telemetry::{ObserverHub, StructuredEventEmitter, TracingObserver};

// Stand-in for the pipeline entity that owns the observer list.
struct CompilationContext {
    hub: ObserverHub,
    sources: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TelemetryConfig::from_env();
    init_tracing(&config);
    tracing::info!("Stagescope demo booting (instrumentation={})", config.instrumentation);

    let context = Arc::new(CompilationContext {
        hub: ObserverHub::new(),
        sources: (0..4).map(|i| format!("module_{}.src", i)).collect(),
    });
    context.hub.subscribe(Arc::new(TracingObserver::new("console")));

    let emitter = StructuredEventEmitter::global();

    for phase in ["parse", "check", "emit"] {
        emitter.start_phase(Some(phase));
        let _phase_metric = context.hub.start_metric(phase);

        // Stages run file-parallel on blocking workers.
        let mut workers = Vec::new();
        for (index, source) in context.sources.iter().cloned().enumerate() {
            let context = context.clone();
            workers.push(tokio::task::spawn_blocking(move || {
                run_stage(emitter, &context, phase, &source, index)
            }));
        }
        for worker in workers {
            if let Err(e) = worker.await? {
                context.hub.track_exception(&e)?;
                emitter.log_error("Driver", &format!("{:#}", e));
            }
        }
    }

    emitter.end_phase();
    context.hub.track_on_completed();
    tracing::info!("Stagescope demo finished");
    Ok(())
}

fn run_stage(
    emitter: &StructuredEventEmitter,
    context: &CompilationContext,
    phase: &str,
    source: &str,
    index: usize,
) -> anyhow::Result<()> {
    let _timer = emitter.start_metric(phase, source);
    context.hub.track_event(&format!("{}:{}", phase, source))?;

    for _ in 0..=index {
        emitter.count(&format!("{}.visit", phase));
    }
    std::thread::sleep(Duration::from_millis(5 * (index as u64 + 1)));

    if phase == "check" && index == 3 {
        anyhow::bail!("{}: unresolved name `main`", source);
    }
    Ok(())
}
