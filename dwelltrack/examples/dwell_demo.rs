use dwelltrack::{Bbox, DwellTracker, TrackerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Simulating a 30fps camera watching one object dwell and leave...");

    let mut tracker = DwellTracker::new(TrackerConfig {
        max_disappeared: 30, // 1s at 30fps, short enough to demo pruning
        ..TrackerConfig::default()
    });

    // Object drifts right for 4 seconds, then leaves the scene
    for frame in 0..165u32 {
        let now = frame as f64 / 30.0;
        let detections = if frame < 120 {
            vec![Bbox::new(100.0 + frame as f32, 80.0, 40.0, 90.0)]
        } else {
            vec![]
        };

        tracker.update(&detections, now);

        if frame % 30 == 0 {
            for track in tracker.tracks() {
                println!(
                    "  t={:.1}s track {} at {} disappeared={} status={}",
                    now,
                    track.id(),
                    track.bbox(),
                    track.disappeared(),
                    tracker.status(track.id())
                );
            }
        }
    }

    for event in tracker.take_events() {
        log::debug!("event: {:?}", event);
    }

    println!("done: {} live tracks after the object left", tracker.len());
    Ok(())
}
