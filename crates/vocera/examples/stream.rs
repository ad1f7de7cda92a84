//! Reference streaming driver.
//!
//! Reads 16 kHz, 16-bit, mono PCM in 10 ms chunks — raw little-endian
//! samples from stdin, or a WAV file with `--wav` — and prints one line per
//! complete chunk: `-1` while no decision is available, otherwise the
//! speech probability. A trailing partial chunk ends the stream cleanly.
//!
//! ```sh
//! ffmpeg -i input.mp3 -f s16le -ar 16000 -ac 1 - | \
//!     cargo run -p vocera --features examples --example stream
//! ```
//!
//! The front-end slot is filled by a stand-in that derives a flat frame
//! from each chunk's mean level, and the model is the all-zero placeholder;
//! real deployments implement [`FeatureExtractor`] over their DSP front end
//! (30 ms window, 10 ms step, 40 mel channels — see `FrontendConfig`) and
//! link the exported production weights.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use vocera::common::{BYTES_PER_CHUNK, NUM_FEATURES, SAMPLE_RATE_HZ, SAMPLES_PER_CHUNK};
use vocera::{FeatureExtractor, Vad, VadModel};

#[derive(Debug, Parser)]
#[command(about = "Stream chunks of mono 16 kHz PCM through the VAD engine")]
struct Args {
    /// Read from a WAV file instead of raw samples on stdin.
    #[arg(long)]
    wav: Option<PathBuf>,
}

/// Stand-in front end: one flat log-level frame per chunk.
///
/// Placeholder only — it carries none of the spectral detail the trained
/// weights expect. Swap in a production front end for real use.
struct MeanLevelFrontend;

impl FeatureExtractor for MeanLevelFrontend {
    fn extract(&mut self, samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<[f32; NUM_FEATURES]> {
        let mean = samples.iter().map(|&s| f32::from(s).abs()).sum::<f32>()
            / SAMPLES_PER_CHUNK as f32;
        Some([mean.ln_1p(); NUM_FEATURES])
    }

    fn reset(&mut self) {}
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut vad = Vad::new(VadModel::zeroed(), Box::new(MeanLevelFrontend))?;

    match args.wav {
        Some(path) => stream_wav(&mut vad, &path),
        None => stream_stdin(&mut vad),
    }
}

fn print_decision(decision: Option<f32>) {
    match decision {
        Some(probability) => println!("{probability}"),
        None => println!("-1"),
    }
}

fn stream_stdin(vad: &mut Vad) -> Result<()> {
    let mut stdin = io::stdin().lock();
    let mut chunk = [0u8; BYTES_PER_CHUNK];

    loop {
        match stdin.read_exact(&mut chunk) {
            Ok(()) => {}
            // Short/final read: done.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e).context("reading stdin"),
        }
        let mut samples = [0i16; SAMPLES_PER_CHUNK];
        for (sample, bytes) in samples.iter_mut().zip(chunk.chunks_exact(2)) {
            *sample = i16::from_le_bytes([bytes[0], bytes[1]]);
        }
        print_decision(vad.process_10ms(&samples));
    }
}

fn stream_wav(vad: &mut Vad, path: &Path) -> Result<()> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.sample_rate != SAMPLE_RATE_HZ || spec.channels != 1 || spec.bits_per_sample != 16 {
        bail!(
            "expected {SAMPLE_RATE_HZ} Hz 16-bit mono, got {} Hz {}-bit {} channel(s)",
            spec.sample_rate,
            spec.bits_per_sample,
            spec.channels
        );
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .context("decoding samples")?;

    for chunk in samples.chunks_exact(SAMPLES_PER_CHUNK) {
        let samples: &[i16; SAMPLES_PER_CHUNK] = chunk.try_into().expect("exact chunk");
        print_decision(vad.process_10ms(samples));
    }
    Ok(())
}
