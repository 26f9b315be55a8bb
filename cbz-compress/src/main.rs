#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use cbz_compress::{
    config::{Config, DEFAULT_QUALITY},
    pack_pages, recompress_pages, CbzReader,
};
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[clap(about, author, version)]
pub struct Args {
    /// Path to the cbz archive to compress
    #[clap(short, long)]
    pub input: Utf8PathBuf,
    /// The output path, defaults to the input path with a `_compressed` suffix
    #[clap(short, long)]
    pub output: Option<Utf8PathBuf>,
    /// The jpeg quality applied when re-encoding pages, between 1 and 100
    #[clap(short, long, default_value_t = DEFAULT_QUALITY)]
    pub quality: u8,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::new(args.input, args.output, args.quality)?;

    let input_path = config.input();
    let mut cbz_reader =
        CbzReader::from_path(input_path).with_context(|| format!("opening {input_path}"))?;
    let input_len = fs::metadata(input_path)?.len();

    let pages = recompress_pages(&mut cbz_reader, config.quality())?;
    let cbz_writer_finished = pack_pages(&pages)?;
    let output_len = cbz_writer_finished.as_bytes().len();

    let output_path = config.output();
    debug!("writing cbz file to {output_path}");
    cbz_writer_finished
        .write_to_path(output_path)
        .with_context(|| format!("writing {output_path}"))?;
    info!("compressed {input_path} ({input_len} bytes) into {output_path} ({output_len} bytes)");

    Ok(())
}
