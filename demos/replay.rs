//! Replay a recorded relay log and print each snapshot.
//!
//! ```text
//! cargo run --example replay -- session.jsonl [config.yaml]
//! RUST_LOG=lapdelta=debug cargo run --example replay -- session.jsonl
//! ```

use anyhow::Context;
use futures::StreamExt;
use lapdelta::{EngineConfig, LapDelta, LapTime, TargetKind};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lapdelta=info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let log = args.next().context("usage: replay <event-log.jsonl> [config.yaml]")?;
    let config = match args.next() {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let connection = LapDelta::replay_with(&log, &config).await?;
    let mut snapshots = connection.snapshot_updates();

    let mut last_lap = 0;
    while let Some(snapshot) = snapshots.next().await {
        println!("{}", snapshot);

        if snapshot.lap_number != last_lap {
            last_lap = snapshot.lap_number;
            if let Some(best) = snapshot.target(TargetKind::PersonalBest) {
                let reference = best.reference_lap_time_ms.map(i64::from).unwrap_or_default();
                println!("  personal best: lap {} in {}", best.lap_number, LapTime::from_ms(reference));
            }
            for change in &snapshot.weather_changes {
                println!("  +{} min: {}", change.time_offset, change.weather().label());
            }
        }
    }

    match connection.latest() {
        Some(last) => println!("final: lap {} at {:.0} m", last.lap_number, last.lap_distance),
        None => println!("no lap data in {}", log),
    }
    Ok(())
}
