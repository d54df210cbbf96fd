use argh::FromArgs;
use std::{path::PathBuf, time::Instant};

use rasterconv::{
    imgproc::{
        filter::{convolve3x3, KernelType},
        parallel::ExecutionStrategy,
    },
    io::functional as F,
};

#[derive(FromArgs)]
/// Apply a 3x3 convolution kernel to an image.
struct Args {
    /// path to the input image (jpg, png, bmp, tga, ...)
    #[argh(positional)]
    image_path: PathBuf,

    /// the kernel to apply, one of edge, sharpen, blur, gauss, emboss or identity
    #[argh(positional)]
    kernel: KernelType,

    /// path to the output png image
    #[argh(option, short = 'o', default = "PathBuf::from(\"output.png\")")]
    output: PathBuf,

    /// number of worker threads, defaults to the number of cores
    #[argh(option, short = 'n')]
    num_workers: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // read the image
    let image = F::read_image_any(&args.image_path)?;
    log::info!(
        "loaded {} with {} channels",
        image.size(),
        image.num_channels()
    );

    let strategy = ExecutionStrategy::from_num_workers(args.num_workers);
    log::info!(
        "starting {} convolution with {} workers",
        args.kernel,
        strategy.num_workers()
    );

    let start = Instant::now();
    let filtered = convolve3x3(&image, args.kernel, strategy)?;
    log::info!("took {:.6} seconds", start.elapsed().as_secs_f64());

    F::write_image_png(&args.output, &filtered)?;
    log::info!("saved {}", args.output.display());

    Ok(())
}
