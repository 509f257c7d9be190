use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use tracing::{ info, Level };
use tracing_subscriber::FmtSubscriber;

use raycast::canvas::PpmFormat;
use raycast::consts::OUT_FILE;
use raycast::error::RenderError;
use raycast::light::Shading;
use raycast::parallel::render_with_threads;
use raycast::reader::read_scene;

/// Renders a sphere and plane scene description to a PPM image.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// Image width in pixels
    width: usize,

    /// Image height in pixels
    height: usize,

    /// Scene description file
    #[clap(parse(from_os_str))]
    input: PathBuf,

    /// Output image [default: ./out.ppm]
    #[clap(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Write plain (P3) instead of binary (P6) PPM
    #[clap(long)]
    ascii: bool,

    /// Shade with diffuse and specular lighting instead of flat colors
    #[clap(long)]
    lit: bool,

    /// Render threads, 0 for one per core
    #[clap(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Print the validated scene as JSON and exit without rendering
    #[clap(long)]
    dump_scene: bool,

    /// Enable verbose logging
    #[clap(short, long)]
    verbose: bool,

    /// Disable colored output
    #[clap(long)]
    no_color: bool,
}

fn run(opts: &Options) -> Result<(), RenderError> {
    if opts.width == 0 || opts.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: opts.width,
            height: opts.height,
        });
    }

    let file = File::open(&opts.input).map_err(|source| RenderError::Open {
        path: opts.input.clone(),
        source,
    })?;

    let scene = read_scene(file)?;
    info!("Read {} objects and {} lights from {}",
        scene.objects.len(), scene.lights.len(), opts.input.display());

    if opts.dump_scene {
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    let shading = if opts.lit { Shading::Lit } else { Shading::Flat };
    let format = if opts.ascii { PpmFormat::Plain } else { PpmFormat::Raw };
    let output = opts.output.clone().unwrap_or_else(|| PathBuf::from(OUT_FILE));

    info!("Rendering {}x{} image", opts.width, opts.height);
    let image = render_with_threads(&scene, opts.width, opts.height, shading,
        opts.threads)?;

    image.save(&output, format).map_err(|source| RenderError::Write {
        path: output.clone(),
        source,
    })?;

    info!("Saved render to {}.", output.display());
    Ok(())
}

fn main() {
    let opts = Options::parse();

    let log_level = if opts.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!opts.no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    if let Err(e) = run(&opts) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
