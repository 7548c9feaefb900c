use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fairway_planner::course::{builtin_presets, find_preset, load_presets};
use fairway_planner::geo::tiles::image_size;
use fairway_planner::planner::{ShotPlan, ShotPlanner};
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan the shots from tee to hole around obstacles", long_about = None)]
struct Args {
    /// Course preset name
    #[arg(long, default_value = "bethemont")]
    preset: String,

    /// JSON file with presets to use instead of the built-in ones
    #[arg(long)]
    presets_file: Option<PathBuf>,

    /// Directory the preset's obstacle and terrain files are relative to
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Override the lattice spacing (degrees)
    #[arg(long)]
    spacing: Option<f64>,

    /// Build the visibility graph on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print the plan as JSON, with the route in image pixels
    #[arg(long)]
    json: bool,
}

/// Plan plus what a renderer needs to draw it on the course mosaic.
#[derive(Serialize)]
struct RenderedPlan<'a> {
    image_width: u32,
    image_height: u32,
    pixels: Vec<(i64, i64)>,
    #[serde(flatten)]
    plan: &'a ShotPlan,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loaded;
    let presets = match &args.presets_file {
        Some(path) => {
            loaded = load_presets(path)
                .with_context(|| format!("failed to load presets from {}", path.display()))?;
            loaded.as_slice()
        }
        None => builtin_presets(),
    };
    let preset = find_preset(presets, &args.preset)?;
    info!("Using preset {} ({})", preset.name, preset.title);

    let mut course = preset
        .course(&args.data_dir)
        .with_context(|| format!("failed to load course data for {}", preset.name))?;
    if let Some(spacing) = args.spacing {
        course.spacing = spacing;
    }

    let bounds = course.bounds;
    println!("---- {} ----", preset.title);
    println!(
        "lat_min = {}, lat_max = {}, lon_min = {}, lon_max = {}",
        bounds.lat_min, bounds.lat_max, bounds.lon_min, bounds.lon_max
    );
    println!(
        "Distance from tee to hole: {:.1} meters",
        course.tee.distance(&course.hole)
    );

    let plan = ShotPlanner::new()
        .parallel(!args.sequential)
        .plan(&course)
        .context("planning failed")?;

    if args.json {
        let (image_width, image_height) = image_size(preset.tiles, preset.tiles);
        let rendered = RenderedPlan {
            image_width,
            image_height,
            pixels: plan.pixel_path(&bounds, image_width, image_height),
            plan: &plan,
        };
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    if !plan.found() {
        println!("No path found");
        return Ok(());
    }
    for (i, segment) in plan.segments.iter().enumerate() {
        println!(
            "Shot {}: Distance = {:.1} meters, Use {}",
            i + 1,
            segment.length,
            segment.club.name
        );
    }
    println!(
        "{} shots, {:.1} meters in total",
        plan.shot_count(),
        plan.total_distance()
    );
    Ok(())
}
