use event_action::{Callback, Event, EventConfig, Interval, SharedEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// 从环境变量 `EVENT_CONFIG`（JSON）读取配置，缺省为不节流
fn load_config() -> anyhow::Result<EventConfig> {
    match std::env::var("EVENT_CONFIG") {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(_) => Ok(EventConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = load_config()?;
    let tick: SharedEvent<u64> = Event::with_config("tick", config).into();

    let total = Arc::new(AtomicU64::new(0));
    let sum = {
        let total = total.clone();
        Callback::new(move |n: &u64| {
            total.fetch_add(*n, Ordering::SeqCst);
        })
    };
    let report = Callback::new(|n: &u64| tracing::info!(tick = n, "throttled report"));
    let guard = Callback::new(|n: &u64| -> anyhow::Result<()> {
        anyhow::ensure!(*n <= 1_000, "tick counter overflow: {n}");
        Ok(())
    });

    tick.add_action(&sum);
    tick.add_action_with_interval(&report, Interval::from_millis(500));
    tick.add_action(&guard);

    // 另一个线程在中途退订 sum
    let unsubscriber = {
        let tick = tick.clone();
        let sum = sum.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(1_000));
            tick.remove_action(&sum);
        })
    };

    for n in 1..=15 {
        tick.trigger(&n)?;
        thread::sleep(Duration::from_millis(100));
    }
    unsubscriber
        .join()
        .map_err(|_| anyhow::anyhow!("unsubscriber thread panicked"))?;

    tracing::info!(
        total = total.load(Ordering::SeqCst),
        actions = tick.len(),
        "demo finished"
    );

    if let Err(err) = tick.trigger(&5_000) {
        tracing::warn!(%err, "trigger aborted");
    }

    Ok(())
}
