// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Command-line front end for phasm-video.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use phasm_video::{embed_file, extract_file, CapacityProfile, EcLevel, EmbedConfig};

#[derive(Parser)]
#[command(name = "phasmvideo", version, about = "Hide binary payloads in video files as QR symbols")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a payload file into a video.
    Embed {
        /// Cover video to embed into.
        #[arg(long)]
        video: PathBuf,
        /// Payload file to hide.
        #[arg(long)]
        payload: PathBuf,
        /// Output video (Matroska recommended).
        #[arg(long)]
        output: PathBuf,
        /// QR symbol version (1-40).
        #[arg(long, default_value_t = 40)]
        qr_version: i16,
        /// QR error-correction level (L, M, Q, H).
        #[arg(long, default_value = "M")]
        ec_level: EcLevel,
        /// Symbol opacity, 0.0-1.0.
        #[arg(long, default_value_t = phasm_video::transport::DEFAULT_OPACITY)]
        opacity: f32,
        /// Enable debug logging.
        #[arg(long)]
        verbose: bool,
    },
    /// Extract a hidden payload from a video.
    Extract {
        /// Video containing the hidden payload.
        #[arg(long)]
        video: PathBuf,
        /// File to write the recovered payload to.
        #[arg(long)]
        output: PathBuf,
        /// Enable debug logging.
        #[arg(long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Inputs must exist; the output must not alias the source video.
fn check_paths(inputs: &[&Path], video: &Path, output: &Path) -> Result<()> {
    for input in inputs {
        if !input.is_file() {
            bail!("input file does not exist: {}", input.display());
        }
    }
    let video_canon = video.canonicalize().unwrap_or_else(|_| video.to_path_buf());
    if let Ok(output_canon) = output.canonicalize() {
        if output_canon == video_canon {
            bail!("output must not be the same file as the source video");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Embed {
            video,
            payload,
            output,
            qr_version,
            ec_level,
            opacity,
            verbose,
        } => {
            init_logging(verbose);
            check_paths(&[video.as_path(), payload.as_path()], &video, &output)?;
            if !(1..=40).contains(&qr_version) {
                bail!("QR version must be between 1 and 40");
            }

            let config = EmbedConfig {
                profile: CapacityProfile::new(qr_version, ec_level),
                opacity,
            };
            let report = embed_file(&video, &payload, &output, &config)
                .with_context(|| format!("embedding {} into {}", payload.display(), video.display()))?;
            println!(
                "embedded {} chunk(s) across {} frame(s) into {}",
                report.chunk_count,
                report.frame_count,
                output.display()
            );
        }
        Command::Extract { video, output, verbose } => {
            init_logging(verbose);
            check_paths(&[video.as_path()], &video, &output)?;

            let payload = extract_file(&video, &output)
                .with_context(|| format!("extracting from {}", video.display()))?;
            println!("recovered {} byte(s) into {}", payload.len(), output.display());
        }
    }

    Ok(())
}
