use driveway_monitor::{Detection, FrameMonitor, MonitorConfig};
use dwelltrack::Bbox;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Config comes from a JSON file in production; defaults here.
    let config = MonitorConfig::default();
    let mut monitor = FrameMonitor::new(config)?;

    println!("Feeding a synthetic 30fps detection stream...");

    for frame in 0..150u64 {
        let now = frame as f64 / 30.0;

        // A person lingering near the driveway plus a parked car the
        // monitor is configured to ignore.
        let mut batch = vec![Detection::new(
            "car",
            0.92,
            Bbox::new(420.0, 210.0, 130.0, 85.0),
        )];
        if frame < 130 {
            batch.push(Detection::new(
                "person",
                0.87,
                Bbox::new(100.0 + frame as f32, 80.0, 40.0, 90.0),
            ));
        }

        let overlays = monitor.process_frame_at(&batch, now)?;

        if frame % 30 == 0 {
            println!("frame {:3} ({:4.1}s):", frame, now);
            for overlay in &overlays {
                println!("  draw {} -> {}", overlay.bbox, overlay.label);
            }
        }
    }

    for event in monitor.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
