//! CLI application for single-frame face analysis.
//!
//! Usage:
//!   face-probe <image> <landmarks.json>                    # Human-readable output
//!   face-probe <image> <landmarks.json> --json             # JSON output
//!   face-probe <image> <landmarks.json> -o report.json     # Save to file
//!   face-probe <image> <landmarks.json> --masked-face face.png

use clap::Parser;
use face_probe::{Config, FrameAnalyzer, FrameReport, LandmarkSet, PixelBuffer};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "face-probe")]
#[command(author, version, about = "Face region colors, head pose and exposure gating", long_about = None)]
struct Args {
    /// Input image file
    #[arg(required = true)]
    image: PathBuf,

    /// Landmark JSON file: an array of {"x", "y", "z"} objects, normalized to the frame
    #[arg(required = true)]
    landmarks: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the masked face crop as PNG when the frame passes the quality gate
    #[arg(long)]
    masked_face: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output<'a> {
    image: String,
    width: u32,
    height: u32,
    landmark_count: usize,
    #[serde(flatten)]
    report: &'a FrameReport,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {:?}", path);
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    log::info!("Loading image {:?}", args.image);
    let frame = PixelBuffer::from(image::open(&args.image)?.to_rgba8());

    log::info!("Loading landmarks {:?}", args.landmarks);
    let landmarks: LandmarkSet = serde_json::from_str(&std::fs::read_to_string(&args.landmarks)?)?;
    log::debug!("{} landmarks for a {}x{} frame", landmarks.len(), frame.width(), frame.height());

    let mut analyzer = FrameAnalyzer::new(config);
    let mut throttle = analyzer.throttle();
    let report = analyzer.analyze(&frame, &landmarks, &mut throttle, Instant::now())?;

    if let Some(ref path) = args.masked_face {
        match report.masked_face.clone() {
            Some(face) => {
                face.into_rgba_image()?.save(path)?;
                log::info!("Masked face written to {:?}", path);
            }
            None => log::warn!("Frame did not pass the quality gate; no masked face written"),
        }
    }

    let output = Output {
        image: args.image.display().to_string(),
        width: frame.width(),
        height: frame.height(),
        landmark_count: landmarks.len(),
        report: &report,
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        log::info!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(output: &Output<'_>) -> String {
    let report = output.report;
    let mut s = String::new();

    s.push_str(&format!("Image: {} ({}x{})\n", output.image, output.width, output.height));
    s.push_str(&format!("Landmarks: {} points\n", output.landmark_count));

    let b = &report.bounding_box;
    s.push_str(&format!(
        "\nFace box: {:.0}x{:.0} at ({:.0}, {:.0}), {:.1}% of frame\n",
        b.width, b.height, b.x, b.y, b.area_ratio
    ));

    match &report.angles {
        Some(a) => s.push_str(&format!(
            "Pose: yaw {:.1}, pitch {:.1}, roll {:.1}\n",
            a.yaw, a.pitch, a.roll
        )),
        None => s.push_str("Pose: undetermined\n"),
    }

    s.push_str("\nZone colors:\n");
    for zc in &report.zone_colors {
        let color = zc.color.map_or_else(|| "none".to_string(), |c| c.to_hex());
        s.push_str(&format!("  {:<14} {}\n", zc.zone, color));
    }

    if !report.face_colors.is_empty() {
        s.push_str("\nFace colors:\n");
        for cc in &report.face_colors {
            s.push_str(&format!("  {} x{}\n", cc.color.to_hex(), cc.count));
        }
    }

    let l = &report.light;
    s.push_str("\nLight:\n");
    s.push_str(&format!(
        "  Luminance:  face {:.3}, background {:.3}\n",
        l.foreground_luminance, l.background_luminance
    ));
    s.push_str(&format!(
        "  Log-avg:    face {:.3}, background {:.3}\n",
        l.foreground_log_luminance, l.background_log_luminance
    ));
    s.push_str(&format!(
        "  RMS:        face {:.3}, background {:.3}\n",
        l.foreground_rms_contrast, l.background_rms_contrast
    ));
    s.push_str(&format!("  Weber:      {:.3}\n", l.weber_contrast));
    s.push_str(&format!("  Exposure:   {:.2} EV\n", l.exposure_value));

    let v = &report.verdict;
    s.push_str(&format!("\nQuality: {}\n", if v.overall_good { "good" } else { "rejected" }));
    for hint in &v.hints {
        s.push_str(&format!("  - {}\n", hint));
    }

    s
}
