//! Command execution

use std::io::ErrorKind;
use std::ops::ControlFlow;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use gears_core::golden::golden_path;
use gears_core::{
    Animation, CountingRenderer, FrameRateCounter, FrameStatus, GoldenHarness, GoldenMode,
    SceneConfig, Scene, Verdict, run_frames, stl,
};
use serde::Serialize;

use crate::args::{Args, Command, USAGE};
use crate::error::CliError;

/// Per-gear statistics printed by `info`
#[derive(Debug, Serialize)]
pub struct GearReport {
    pub name: String,
    pub teeth: u32,
    pub vertices: usize,
    pub triangles: usize,
    pub indices: usize,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

pub fn execute(args: Args) -> Result<ExitCode, CliError> {
    if args.command == Command::Help {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    match args.command {
        Command::Info { json } => info(&config, json),
        Command::Export { output, frame } => export(&config, &output, frame),
        Command::Run { frames } => run(&config, frames),
        Command::Check { capture_dir, mode } => {
            let verdict = check(&config, &capture_dir, mode)?;
            println!("{verdict}");
            Ok(if verdict.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::WriteConfig { output } => {
            config.save(&output)?;
            tracing::info!("Wrote scene configuration to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Help => Ok(ExitCode::SUCCESS),
    }
}

pub fn gear_reports(scene: &Scene) -> Vec<GearReport> {
    scene
        .gears()
        .iter()
        .map(|gear| {
            let mesh = gear.mesh();
            let bounds = mesh.bounds();
            GearReport {
                name: gear.name.clone(),
                teeth: mesh.teeth(),
                vertices: mesh.vertex_count(),
                triangles: mesh.triangle_count(),
                indices: mesh.index_count(),
                bounds_min: bounds.min.to_array(),
                bounds_max: bounds.max.to_array(),
            }
        })
        .collect()
}

fn info(config: &SceneConfig, json: bool) -> Result<ExitCode, CliError> {
    let scene = Scene::from_config(config);
    let reports = gear_reports(&scene);

    if json {
        let text =
            serde_json::to_string_pretty(&reports).map_err(|e| CliError::Json(e.to_string()))?;
        println!("{text}");
    } else {
        for r in &reports {
            println!(
                "{:<8} teeth={:<4} vertices={:<6} triangles={:<6} indices={:<6} bounds={:?}..{:?}",
                r.name, r.teeth, r.vertices, r.triangles, r.indices, r.bounds_min, r.bounds_max
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn export(config: &SceneConfig, output: &Path, frame: u64) -> Result<ExitCode, CliError> {
    let scene = Scene::from_config(config);
    let mut animation = Animation::new(config.animation);
    let angle = animation.advance_by(frame);
    stl::save_scene_stl(&scene, angle, output)?;
    Ok(ExitCode::SUCCESS)
}

fn run(config: &SceneConfig, frames: u64) -> Result<ExitCode, CliError> {
    let scene = Scene::from_config(config);
    let mut animation = Animation::new(config.animation);
    let mut renderer = CountingRenderer::default();
    let mut fps = FrameRateCounter::default();
    let start = Instant::now();

    let rendered = run_frames(&scene, &mut animation, &mut renderer, Some(frames), |_, _| {
        fps.tick(start.elapsed().as_secs_f64());
        ControlFlow::Continue(())
    });

    let seconds = start.elapsed().as_secs_f64();
    tracing::info!(
        "Rendered {} frames ({} draw calls, {} triangles) in {:.3} s, final angle {:.2}",
        rendered,
        renderer.draw_calls,
        renderer.triangles,
        seconds,
        animation.angle()
    );
    Ok(ExitCode::SUCCESS)
}

/// Feed `<capture_dir>/<app>_frame<k>` files through the harness as grabbed frames
pub fn check(
    config: &SceneConfig,
    capture_dir: &Path,
    mode: GoldenMode,
) -> Result<Verdict, CliError> {
    let golden = &config.golden;
    if mode == GoldenMode::Off {
        return Err(CliError::Usage("check needs -golden or -test".into()));
    }
    if golden.interval == 0 {
        return Err(CliError::Usage("golden interval must be positive".into()));
    }

    let mut harness = GoldenHarness::new(mode, golden.clone(), config.viewport.frame_bytes());

    loop {
        let pixels = if harness.captures_current_frame() {
            let index = harness.frame() / golden.interval;
            let path = golden_path(capture_dir, &golden.app_name, index);
            match std::fs::read(&path) {
                Ok(pixels) => pixels,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return end_of_capture(capture_dir, mode, index);
                }
                Err(e) => return Err(CliError::Io(format!("{}: {e}", path.display()))),
            }
        } else {
            Vec::new()
        };

        if let FrameStatus::Finished(verdict) = harness.handle_frame(move || pixels)? {
            return Ok(verdict);
        }
    }
}

/// The recording ran out before the harness finished
fn end_of_capture(capture_dir: &Path, mode: GoldenMode, index: u64) -> Result<Verdict, CliError> {
    if index == 0 {
        return Err(CliError::NoCaptures(capture_dir.to_path_buf()));
    }
    tracing::debug!("Capture ended after {} images", index);
    Ok(match mode {
        GoldenMode::Generate => Verdict::Generated { images: index },
        _ => Verdict::Pass { frames: index - 1 },
    })
}
