//! jpegcanvas CLI - encode, decode and inspect canvas JPEG containers.
//!
//! Works on raw interleaved RGBA8 pixel data and the crate's text-header
//! container format.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use jpegcanvas_rs::{container, Canvas, ChannelFn, StreamBacking};

/// Canvas-based baseline JPEG codec
#[derive(Parser)]
#[command(name = "jpegcanvas")]
#[command(version)]
#[command(about = "Encode, decode and inspect canvas JPEG containers", long_about = None)]
#[command(after_help = "EXAMPLES:
    jpegcanvas encode -i pixels.raw -o image.jc -w 512 -H 512 -q 1.0
    jpegcanvas decode -i image.jc -o pixels.raw
    jpegcanvas decode -i image.jc -o image.ppm -f ppm
    jpegcanvas generate -o gaussian.jc --pattern gaussian -w 256 -H 256
    jpegcanvas info -i image.jc

Raw pixel files are interleaved 8-bit RGBA, row-major, 4 bytes per pixel.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode raw RGBA pixels into a container
    #[command(visible_alias = "e")]
    Encode {
        /// Input raw RGBA pixel file
        #[arg(short, long)]
        input: PathBuf,

        /// Output container file
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(short, long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Quantization quality factor (positive float)
        #[arg(short, long, default_value = "1.0")]
        quality: f32,

        /// Write the readable text bit stream instead of the packed one
        #[arg(long)]
        text_bits: bool,
    },

    /// Decode a container to raw RGBA pixels or a PPM image
    #[command(visible_alias = "d")]
    Decode {
        /// Input container file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: raw RGBA bytes or PPM (drops alpha)
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,
    },

    /// Print header and payload details without a full decode
    #[command(visible_alias = "i")]
    Info {
        /// Input container file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Render a test pattern and encode it
    #[command(visible_alias = "g")]
    Generate {
        /// Output container file
        #[arg(short, long)]
        output: PathBuf,

        /// Test pattern to render
        #[arg(short, long, default_value = "gaussian", value_enum)]
        pattern: Pattern,

        /// Image width in pixels
        #[arg(short, long, default_value = "256")]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long, default_value = "256")]
        height: u32,

        /// Quantization quality factor (positive float)
        #[arg(short, long, default_value = "1.0")]
        quality: f32,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw interleaved RGBA bytes
    Raw,
    /// Portable PixMap, alpha discarded
    Ppm,
}

#[derive(Clone, Debug, ValueEnum)]
enum Pattern {
    /// One flat color
    Solid,
    /// Linear per-channel gradients
    Gradient,
    /// Centered 2D Gaussian in every color channel
    Gaussian,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            width,
            height,
            quality,
            text_bits,
        } => encode_pixels(&input, &output, width, height, quality, text_bits),
        Commands::Decode { input, output, format } => decode_container(&input, &output, &format),
        Commands::Info { input } => show_info(&input),
        Commands::Generate {
            output,
            pattern,
            width,
            height,
            quality,
        } => generate_pattern(&output, &pattern, width, height, quality),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn encode_pixels(
    input: &PathBuf,
    output: &PathBuf,
    width: u32,
    height: u32,
    quality: f32,
    text_bits: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pixels = fs::read(input)?;
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(format!(
            "raw input is {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            expected,
            width,
            height
        )
        .into());
    }

    let mut canvas = Canvas::new(width as usize, height as usize)?;
    canvas.pixels_mut().copy_from_slice(&pixels);
    let backing = if text_bits { StreamBacking::Text } else { StreamBacking::Packed };
    canvas.save_with_backing(output, quality, backing)?;
    println!("Encoded {}x{} image to {:?}", width, height, output);
    Ok(())
}

fn decode_container(
    input: &PathBuf,
    output: &PathBuf,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = Canvas::load(input)?;
    match format {
        OutputFormat::Raw => fs::write(output, canvas.pixels())?,
        OutputFormat::Ppm => write_ppm(output, &canvas)?,
    }
    println!(
        "Decoded {}x{} image to {:?}",
        canvas.width(),
        canvas.height(),
        output
    );
    Ok(())
}

fn show_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let (header, stream) = container::read(&data)?;
    let backing = match stream.backing() {
        StreamBacking::Text => "text",
        StreamBacking::Packed => "packed",
    };
    let raw_bits = u64::from(header.width) * u64::from(header.height) * 4 * 8;
    println!("Width:       {}", header.width);
    println!("Height:      {}", header.height);
    println!("Quality:     {}", header.quality);
    println!("Backing:     {}", backing);
    println!("Payload:     {} bits", stream.len());
    println!(
        "Compression: {:.2}x",
        raw_bits as f64 / stream.len() as f64
    );
    Ok(())
}

fn generate_pattern(
    output: &PathBuf,
    pattern: &Pattern,
    width: u32,
    height: u32,
    quality: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut canvas = Canvas::new(width as usize, height as usize)?;
    match pattern {
        Pattern::Solid => canvas.fill([64, 128, 192, 255]),
        Pattern::Gradient => {
            let w = width.max(1) as f32;
            let h = height.max(1) as f32;
            let red = move |_: usize, j: usize, _: &[f32]| 255.0 * j as f32 / w;
            let green = move |i: usize, _: usize, _: &[f32]| 255.0 * i as f32 / h;
            let blue = move |i: usize, j: usize, _: &[f32]| 255.0 * (i + j) as f32 / (w + h);
            let alpha = |_: usize, _: usize, _: &[f32]| 255.0;
            let evaluators: [ChannelFn<'_>; 4] = [&red, &green, &blue, &alpha];
            canvas.fill_channels(evaluators, [&[], &[], &[], &[]], 0b1111);
        }
        Pattern::Gaussian => {
            let params = [
                width as f32 / 2.0,
                height as f32 / 2.0,
                width.min(height) as f32 / 6.0,
                200.0,
            ];
            canvas.fill_with(
                |i, j, p| {
                    let dx = j as f32 - p[0];
                    let dy = i as f32 - p[1];
                    p[3] * (-(dx * dx + dy * dy) / (2.0 * p[2] * p[2])).exp()
                },
                &params,
                false,
            );
        }
    }
    canvas.save(output, quality)?;
    println!(
        "Generated {:?} pattern at {}x{} into {:?}",
        pattern, width, height, output
    );
    Ok(())
}

fn write_ppm(path: &PathBuf, canvas: &Canvas) -> Result<(), std::io::Error> {
    let mut out = Vec::with_capacity(canvas.width() * canvas.height() * 3 + 32);
    out.extend_from_slice(format!("P6\n{} {}\n255\n", canvas.width(), canvas.height()).as_bytes());
    for pixel in canvas.pixels().chunks_exact(4) {
        out.extend_from_slice(&pixel[..3]);
    }
    fs::write(path, out)
}
