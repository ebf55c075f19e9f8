//! Command-line driver for the two Throng pipelines.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use throng_core::config::PipelineConfig;
use throng_engine::{
    analyze_scenario, synthesize_dataset, write_reference_tensors, AnalyzeOptions,
    DefaultProfileModel,
};
use throng_io::write_analysis;

#[derive(Parser, Debug)]
#[command(
    name = "throng",
    about = "Convert pedestrian trajectory logs into crowd-behavior feature tensors",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate training tensors and labels from synthetic scenario exports.
    Synthesize {
        /// Directory of scenario directories (each with env.json and
        /// trajectory files).
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Output directory for compressed feature tensors.
        #[arg(long = "images")]
        images: PathBuf,

        /// Output path for the merged label map.
        #[arg(long = "labels")]
        labels: PathBuf,

        /// Worker threads (auto-detected when omitted).
        #[arg(short = 'w', long = "workers")]
        workers: Option<usize>,
    },
    /// Analyze a field recording into per-window weight profiles.
    Analyze {
        /// Recording directory (env.json plus trajectory files).
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Output directory for the analysis document and reference
        /// tensors.
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Frames per analysis window.
        #[arg(long = "frame-interval", default_value_t = 250)]
        frame_interval: u64,

        /// Capture framerate, frames per second.
        #[arg(long = "framerate", default_value_t = 25.0)]
        framerate: f64,

        /// Capture width, for the cell aspect ratio.
        #[arg(long = "video-width", default_value_t = 60)]
        video_width: u32,

        /// Capture height, for the cell aspect ratio.
        #[arg(long = "video-height", default_value_t = 48)]
        video_height: u32,

        /// Cell count along the larger side.
        #[arg(long = "grid-multiplier", default_value_t = 4)]
        grid_multiplier: u32,

        /// Keep every n-th trajectory row.
        #[arg(long = "row-step", default_value_t = 1)]
        row_step: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    match Cli::parse().command {
        Command::Synthesize {
            input,
            images,
            labels,
            workers,
        } => {
            let cfg = PipelineConfig::synthetic();
            let report = synthesize_dataset(&input, &images, &labels, &cfg, workers)?;
            println!("{report}");
            if !report.is_clean() {
                return Err(format!("{} items failed", report.failures.len()).into());
            }
        }
        Command::Analyze {
            input,
            output,
            frame_interval,
            framerate,
            video_width,
            video_height,
            grid_multiplier,
            row_step,
        } => {
            let cfg = PipelineConfig::field(framerate, row_step);
            let opts = AnalyzeOptions {
                frame_interval,
                framerate,
                video_width,
                video_height,
                grid_multiplier,
                ..AnalyzeOptions::default()
            };
            let result = analyze_scenario(&input, &cfg, &opts, &DefaultProfileModel)?;
            write_analysis(&output.join("simulation_data.json"), &result.document)?;
            let written =
                write_reference_tensors(&output.join("images"), &result, frame_interval)?;
            let valid = result.valid.iter().filter(|&&v| v).count();
            println!(
                "{} cells over {} frames ({} with observed traffic), {} tensors written",
                result.images.len(),
                result.max_frame,
                valid,
                written
            );
        }
    }
    Ok(())
}
