use crate::animate::AnimateOptions;
use crate::batch::BatchOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Batch-produce lofi background videos from images or animations and audio folders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON settings file (ffmpeg paths, bitrate, codec, jobs)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pair every image with its own run of unused audio tracks and render one video each
    Batch(BatchArgs),

    /// List audio files in a folder with their durations and the total
    Durations {
        /// Folder to analyze
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Loop an animation under the stitched audio of a folder
    Animate(AnimateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Folder containing image files
    pub image_folder: PathBuf,
    /// Folder containing audio files
    pub audio_folder: PathBuf,
    /// Minimum audio length of each video, in minutes
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub minutes: u32,
    /// Output folder
    #[arg(default_value = "./output")]
    pub output_folder: PathBuf,
    /// Maximum number of videos rendered at once
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// Keep intermediate audio files in the output folder
    #[arg(long)]
    pub keep_temp: bool,
    /// Only print the plan, do not render
    #[arg(long)]
    pub dry_run: bool,
    /// Print the plan as JSON on stdout
    #[arg(long)]
    pub json: bool,
    /// Open the output folder when done
    #[arg(long)]
    pub open: bool,
}

impl BatchArgs {
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            image_folder: self.image_folder.clone(),
            audio_folder: self.audio_folder.clone(),
            target_minutes: self.minutes,
            output_folder: self.output_folder.clone(),
            keep_temp: self.keep_temp,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnimateArgs {
    /// Animation file (MP4 recommended)
    pub animation: PathBuf,
    /// Folder containing audio files
    pub audio_folder: PathBuf,
    /// Output video file
    #[arg(short, long, default_value = "lofi_video.mp4")]
    pub output: PathBuf,
    /// Stop adding tracks once this many minutes are reached
    #[arg(long)]
    pub time_limit: Option<u32>,
    /// Pixels to crop from the right edge
    #[arg(long, default_value_t = 0)]
    pub crop_right: u32,
    /// Pixels to crop from the bottom edge
    #[arg(long, default_value_t = 0)]
    pub crop_bottom: u32,
    /// Keep temporary files for debugging
    #[arg(long)]
    pub keep_temp: bool,
}

impl AnimateArgs {
    /// A time limit of 0 means no limit.
    pub fn options(&self) -> AnimateOptions {
        AnimateOptions {
            animation: self.animation.clone(),
            audio_folder: self.audio_folder.clone(),
            output: self.output.clone(),
            time_limit_minutes: self.time_limit.filter(|m| *m > 0),
            crop_right: self.crop_right,
            crop_bottom: self.crop_bottom,
            keep_temp: self.keep_temp,
        }
    }
}
