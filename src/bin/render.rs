use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mandeltile::painter;
use mandeltile::solver::EscapeSolver;
use mandeltile::threads;
use mandeltile::{render, Frame, RenderSettings, Resolution};

#[derive(Debug, StructOpt)]
#[structopt(name = "mandeltile", about = "Tiled parallel Mandelbrot renderer")]
struct Opt {
    /// Left edge of the rendered region of the complex plane
    #[structopt(long, default_value = "-2.0", allow_hyphen_values = true)]
    x_min: f64,

    /// Right edge of the rendered region
    #[structopt(long, default_value = "1.0", allow_hyphen_values = true)]
    x_max: f64,

    /// Bottom edge of the rendered region
    #[structopt(long, default_value = "-1.0", allow_hyphen_values = true)]
    y_min: f64,

    /// Top edge of the rendered region
    #[structopt(long, default_value = "1.0", allow_hyphen_values = true)]
    y_max: f64,

    /// Output image width in pixels
    #[structopt(long, default_value = "4500")]
    width: usize,

    /// Output image height in pixels
    #[structopt(long, default_value = "3000")]
    height: usize,

    /// Escape iteration budget per pixel
    #[structopt(short = "i", long, default_value = "200")]
    iterations: u32,

    /// Worker count; must be a perfect square, or 0 to pick one from the
    /// CPU count
    #[structopt(short = "w", long, default_value = "4")]
    workers: usize,

    /// Colormap: brbg, greyscale or rainbow
    #[structopt(short = "c", long, default_value = "brbg")]
    colormap: String,

    /// Output image path; the extension selects the encoding
    #[structopt(short = "o", long, default_value = "mandelbrot.png", parse(from_os_str))]
    output: PathBuf,
}

fn run(opt: Opt) -> Result<()> {
    if opt.x_max <= opt.x_min || opt.y_max <= opt.y_min {
        bail!(
            "plane bounds are empty: x [{}, {}], y [{}, {}]",
            opt.x_min,
            opt.x_max,
            opt.y_min,
            opt.y_max
        );
    }
    if opt.iterations == 0 {
        bail!("iteration budget must be positive");
    }
    let workers = if opt.workers == 0 {
        threads::default_workers()
    } else {
        opt.workers
    };

    let period = EscapeSolver::new(opt.iterations).score_period();
    let painter = painter::by_name(&opt.colormap, period)
        .ok_or_else(|| anyhow!("unknown colormap {:?}", opt.colormap))?;

    let settings = RenderSettings {
        frame: Frame::from_nums(opt.x_min, opt.x_max, opt.y_min, opt.y_max),
        resolution: Resolution::new(opt.width, opt.height),
        iterations: opt.iterations,
        workers,
    };
    info!(
        width = opt.width,
        height = opt.height,
        workers,
        colormap = %opt.colormap,
        "rendering"
    );
    let scores = render(&settings)?;
    let img = painter.paint(&scores);
    img.save(&opt.output)
        .with_context(|| format!("writing {}", opt.output.display()))?;
    info!("wrote {}", opt.output.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Err(err) = run(Opt::from_args()) {
        eprintln!("render failed: {:#}", err);
        process::exit(1);
    }
}
