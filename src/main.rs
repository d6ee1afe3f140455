mod app;

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use phong_renderer::logging::init_logging;
use phong_renderer::ScenePaths;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

const USAGE: &str = "usage: phong_renderer [-m mesh] [-c camera] [-l lighting] [-W width] [-H height] \
[-t threads] [-o output.png] [-v log_filter]";

fn value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    return args
        .get(i + 1)
        .map(|value| value.as_str())
        .ok_or_else(|| anyhow!("{} needs a value\n{}", args[i], USAGE));
}

fn number<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = value(args, i)?;
    return text
        .parse::<T>()
        .with_context(|| format!("{} expects a number, got '{}'", args[i], text));
}

#[show_image::main]
fn main() -> Result<()> {
    // Default values.
    let mut paths = ScenePaths::default();
    let mut width = WIDTH;
    let mut height = HEIGHT;
    let mut threads = 1;
    let mut output = None;
    let mut log_filter = None;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-m" => { paths.mesh = PathBuf::from(value(&args, i)?); }
            "-c" => { paths.camera = PathBuf::from(value(&args, i)?); }
            "-l" => { paths.lighting = PathBuf::from(value(&args, i)?); }
            "-W" => { width = number(&args, i)?; }
            "-H" => { height = number(&args, i)?; }
            "-t" => { threads = number(&args, i)?; }
            "-o" => { output = Some(PathBuf::from(value(&args, i)?)); }
            "-v" => { log_filter = Some(value(&args, i)?.to_string()); }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other => return Err(anyhow!("unknown argument '{}'\n{}", other, USAGE)),
        }
        i += 2;
    }
    if width == 0 || height == 0 {
        return Err(anyhow!("frame size must be non-zero, got {}x{}", width, height));
    }

    init_logging(log_filter.as_deref());

    let params = app::Params {
        width,
        height,
        threads,
        paths,
        output,
    };

    app::run(params)?;

    return Ok(());
}
