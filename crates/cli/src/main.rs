use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::warn;

use cgh2d_backend_cpu::CpuBackend;
use cgh2d_core::config::{RunConfig, SourceType};
use cgh2d_core::encoder::encode_single_sideband;
use cgh2d_core::field::ComplexField;
use cgh2d_core::lightfield::{convert_to_field, SeededDiffuser};
use cgh2d_core::pointcloud;
use cgh2d_core::propagation::fresnel_propagation;

mod scene;

#[derive(Parser, Debug)]
#[command(name = "cgh2d", about = "Hologram generator for point-cloud and light-field scenes")]
struct Cli {
    /// Path to a TOML run configuration
    #[arg(short, long)]
    config: PathBuf,
    /// Output PNG path; multi-channel runs get a _ch<N> suffix per channel
    #[arg(short, long)]
    output: PathBuf,
    /// Suppress progress logs (stderr)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    if !cli.quiet {
        eprintln!("[cli] loading config {}", cli.config.display());
    }
    let raw = fs::read_to_string(&cli.config)?;
    let config: RunConfig = toml::from_str(&raw)?;
    config.validate()?;

    let ctx = config.build_context()?;
    if !cli.quiet {
        let pn = ctx.pixel_number();
        eprintln!(
            "[cli] source={} slm={}x{} channels={}",
            config.source_type(),
            pn[0],
            pn[1],
            ctx.channels()
        );
    }

    let backend = CpuBackend::new();
    let start = Instant::now();
    let channels: Vec<ComplexField> = match config.source_type() {
        SourceType::PointCloud => {
            let section = config.pointcloud.as_ref().expect("validated");
            let cloud = scene::load_point_cloud(&section.path)?;
            let fields = pointcloud::generate(&cloud, &section.builder_config(), &ctx);
            if !cli.quiet {
                eprintln!(
                    "[gen] diffracted {} points over {} channel(s) in {:.2?}",
                    cloud.len(),
                    fields.len(),
                    start.elapsed()
                );
            }
            match section.distance {
                Some(distance) => fields
                    .iter()
                    .enumerate()
                    .map(|(channel, field)| {
                        fresnel_propagation(&backend, &ctx, ctx.wavelength(channel), field, distance)
                    })
                    .collect(),
                None => fields,
            }
        }
        SourceType::LightField => {
            let section = config.lightfield.as_ref().expect("validated");
            let light_field =
                scene::load_light_field(&section.directory, section.num_image, section.resolution_image)?;
            let diffuser = SeededDiffuser::new(section.phase_seed);
            let field = convert_to_field(&light_field, &backend, &diffuser);
            if !cli.quiet {
                eprintln!("[gen] converted light field in {:.2?}", start.elapsed());
            }
            // Light-field conversion is single-wavelength; propagate with
            // channel 0 to the hologram plane.
            vec![fresnel_propagation(
                &backend,
                &ctx,
                ctx.wavelength(0),
                &field,
                section.distance,
            )]
        }
    };

    if channels.is_empty() {
        warn!("no diffracted data to encode");
        return Ok(());
    }

    let encode_start = Instant::now();
    let pn = ctx.pixel_number();
    for (channel, field) in channels.iter().enumerate() {
        let encoded = encode_single_sideband(&backend, &ctx, field, &config.encoding);
        let dest = channel_output_path(&cli.output, channel, channels.len());
        scene::write_normalized_png(&dest, &encoded, pn[0], pn[1])?;
        if !cli.quiet {
            eprintln!("[encode] channel {} written to {}", channel, dest.display());
        }
    }
    if !cli.quiet {
        eprintln!(
            "[done] encoded {} channel(s) in {:.2?} (total {:.2?})",
            channels.len(),
            encode_start.elapsed(),
            start.elapsed()
        );
    }
    Ok(())
}

fn channel_output_path(output: &Path, channel: usize, total: usize) -> PathBuf {
    if total == 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("hologram");
    let ext = output.extension().and_then(|s| s.to_str()).unwrap_or("png");
    output.with_file_name(format!("{stem}_ch{channel}.{ext}"))
}
