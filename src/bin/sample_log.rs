// Writes a synthetic render log and matching location file for trying ledlog-render

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "sample_log", about = "Generate a moving-rainbow render log for an LED matrix")]
struct Args {
    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Base name; the log is written as <name>_2d.csv
    #[arg(short, long, default_value = "rainbow")]
    name: String,

    /// Frames to generate
    #[arg(short, long, default_value_t = 250)]
    frames: usize,

    /// Matrix columns
    #[arg(long, default_value_t = 100)]
    width: u32,

    /// Matrix rows
    #[arg(long, default_value_t = 100)]
    height: u32,

    /// Chance per LED per frame of a white sparkle
    #[arg(long, default_value_t = 0.002)]
    sparkle: f64,

    /// RNG seed for reproducible output
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("matrix size must be non-zero, got {}x{}", args.width, args.height);
    }
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {:?}", args.out))?;

    println!("🌈 Generating {} frames for a {}x{} matrix", args.frames, args.width, args.height);

    let locations_path = args.out.join("led_locations.csv");
    write_locations(&locations_path, args.width, args.height)?;
    println!("   ✅ Locations: {:?}", locations_path);

    let log_path = args.out.join(format!("{}_2d.csv", args.name));
    write_log(&log_path, &args)?;
    println!("   ✅ Render log: {:?}", log_path);

    println!("\nTry: ledlog-render gif {:?} --led-locations {:?}", log_path, locations_path);
    Ok(())
}

/// Row-major positions: LED i sits at (i % width, i / width)
fn write_locations(path: &Path, width: u32, height: u32) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for y in 0..height {
        for x in 0..width {
            writer.write_record(&[x.to_string(), y.to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_log(path: &Path, args: &Args) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let num_leds = (args.width * args.height) as usize;
    let mut record = Vec::with_capacity(num_leds * 3);

    for frame in 0..args.frames {
        record.clear();
        for led in 0..num_leds {
            let x = (led as u32 % args.width) as f32;
            let y = (led as u32 / args.width) as f32;

            let [r, g, b] = if rng.gen_bool(args.sparkle.clamp(0.0, 1.0)) {
                [255, 255, 255]
            } else {
                let hue = ((x + y) * 2.0 + frame as f32 * 4.0) % 360.0;
                hsv_to_rgb(hue, 1.0, 0.8)
            };
            record.extend([r.to_string(), g.to_string(), b.to_string()]);
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let c = value * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}
