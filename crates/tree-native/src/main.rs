//! Headless run of the tree animation: plays a scripted timeline at a fixed
//! 60 Hz step and logs how far each group is from where it is heading.
//!
//! Usage: `tree-sim [seconds] [seed]`

use anyhow::Context;
use tree_core::constants::DEFAULT_SEED;
use tree_core::{
    destination, Category, FrameTime, HandSample, InstanceBatches, Mode, SceneConfig,
    TransformBuffer, TreeScene,
};

const STEP: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 20.0;

/// What the script asks for at a given fraction of the run.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cue {
    Mode(Mode),
    Reseed,
}

const SCRIPT: &[(f32, Cue)] = &[
    (0.15, Cue::Mode(Mode::Formed)),
    (0.65, Cue::Reseed),
    (0.85, Cue::Mode(Mode::Chaos)),
];

/// A hand sweeps the frame between 30% and 60% of the run, then leaves.
fn scripted_hand(progress: f32, elapsed: f32) -> HandSample {
    if (0.3..0.6).contains(&progress) {
        HandSample::new(
            0.5 + 0.4 * (elapsed * 0.8).sin(),
            0.5 + 0.3 * (elapsed * 0.5).cos(),
            true,
        )
    } else {
        HandSample::lost()
    }
}

fn parse_args() -> anyhow::Result<(f32, u64)> {
    let mut args = std::env::args().skip(1);
    let seconds = match args.next() {
        Some(s) => s
            .parse::<f32>()
            .with_context(|| format!("seconds must be a number, got `{s}`"))?,
        None => DEFAULT_SECONDS,
    };
    anyhow::ensure!(
        seconds.is_finite() && seconds > 0.0,
        "seconds must be positive"
    );
    let seed = match args.next() {
        Some(s) => s
            .parse::<u64>()
            .with_context(|| format!("seed must be an unsigned integer, got `{s}`"))?,
        None => DEFAULT_SEED,
    };
    Ok((seconds, seed))
}

fn log_groups(scene: &TreeScene, batches: &InstanceBatches, mode: Mode) {
    for group in scene.groups() {
        let Some(buffer) = batches.get(group.category) else {
            continue;
        };
        let (sum, max) = group
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| buffer.read_transform(i).translation.distance(destination(r, mode)))
            .fold((0.0f32, 0.0f32), |(sum, max), d| (sum + d, max.max(d)));
        log::info!(
            "  {:<8} n={:<5} mean={:>7.3} max={:>7.3}",
            group.category.name(),
            group.len(),
            sum / group.len().max(1) as f32,
            max
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let (seconds, seed) = parse_args()?;
    let mut scene = TreeScene::new(SceneConfig::with_counts(
        tree_core::constants::DEFAULT_FOLIAGE_COUNT,
        tree_core::constants::DEFAULT_ORNAMENT_COUNT,
        tree_core::constants::DEFAULT_PHOTO_COUNT,
        seed,
    ))
    .context("building scene")?;
    let mut batches = InstanceBatches::new();
    scene.sync_batches(&mut batches);
    log::info!(
        "tree-sim: {} instances, {:.1}s at 60 Hz, seed {}",
        scene.instance_count(),
        seconds,
        seed
    );
    for category in Category::ALL {
        if let Some(group) = scene.group(category) {
            log::debug!("  {} x{}", category.name(), group.len());
        }
    }

    let frames = (seconds / STEP).ceil() as u64;
    let mut mode = Mode::default();
    let mut cue = 0;
    let mut reseeds = 0u64;
    for frame in 1..=frames {
        let elapsed = frame as f32 * STEP;
        let progress = elapsed / seconds;

        while let Some(&(at, next)) = SCRIPT.get(cue) {
            if progress < at {
                break;
            }
            cue += 1;
            match next {
                Cue::Mode(m) => {
                    mode = m;
                    log::info!("[{elapsed:6.2}s] mode -> {}", mode.label());
                }
                Cue::Reseed => {
                    reseeds += 1;
                    let changed = scene.reseed(seed.wrapping_add(reseeds))?;
                    scene.sync_batches(&mut batches);
                    log::info!("[{elapsed:6.2}s] reseeded, {} groups changed", changed.len());
                }
            }
        }

        let report = scene.frame(
            mode,
            scripted_hand(progress, elapsed),
            FrameTime::new(STEP, elapsed),
            &mut batches,
        );
        for (_, buffer) in batches.iter_mut() {
            buffer.take_dirty();
        }

        if frame % 60 == 0 || frame == frames {
            let orbit = scene.orbit();
            log::info!(
                "[{elapsed:6.2}s] {} azimuth={:+.3} polar={:.3} camera_moved={} written={}",
                mode.label(),
                orbit.azimuth(),
                orbit.polar(),
                report.camera_moved,
                report.instances_written
            );
            log_groups(&scene, &batches, mode);
        }
    }
    Ok(())
}
