//! Frame decoding CLI subcommand.
//!
//! This subcommand reads frames of real-valued channel samples (one frame
//! per line, whitespace separated) and decodes every frame with the
//! configured decoder. Frames are decoded in parallel, with one decoder
//! instance per worker over a shared parity-check matrix. One CSV row is
//! printed per frame and a summary goes to stderr.

use crate::cli::Run;
use crate::codes::parse_control_file;
use crate::decoder::{DecoderFactory, DecoderImplementation};
use clap::Parser;
use console::style;
use rayon::prelude::*;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Frame decoding CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Decodes frames of channel samples with an LDPC decoder")]
pub struct Args {
    /// Control file with the code definitions
    control: String,
    /// File with one frame of whitespace-separated samples per line
    frames: String,
    /// Index of the code within the control file
    #[arg(long, default_value = "0")]
    code: usize,
    /// Decoder implementation
    #[arg(long, default_value = "min-sum")]
    decoder: DecoderImplementation,
    /// Maximum number of iterations
    #[arg(long, default_value = "100")]
    max_iter: usize,
    /// Alpha parameter for the decoders that use it
    #[arg(long)]
    alpha: Option<f64>,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let codes = parse_control_file(&std::fs::read_to_string(&self.control)?)?;
        let code = codes.get(self.code).ok_or_else(|| {
            format!(
                "code index {} out of range (control file has {} codes)",
                self.code,
                codes.len()
            )
        })?;
        let h = Arc::new(code.h()?);
        let frames = parse_frames(&std::fs::read_to_string(&self.frames)?, h.num_cols())?;
        // Validate the decoder configuration before spinning up the workers.
        self.decoder
            .build_decoder(h.clone(), self.max_iter, self.alpha)?;
        let start = Instant::now();
        let results = frames
            .par_iter()
            .map_init(
                || {
                    self.decoder
                        .build_decoder(h.clone(), self.max_iter, self.alpha)
                        .expect("decoder configuration already validated")
                },
                |decoder, frame| match decoder.decode(frame) {
                    Ok(out) => (true, out),
                    Err(out) => (false, out),
                },
            )
            .collect::<Vec<_>>();
        let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
        for (idx, (success, out)) in results.iter().enumerate() {
            println!("{},{},{},{}", idx, success, out.iterations, bit_string(&out.codeword));
        }
        let decoded = results.iter().filter(|(success, _)| *success).count();
        eprintln!(
            "{} {} frames, {} decoded, {} failed, {} with {} ({})",
            style("summary:").bold(),
            results.len(),
            decoded,
            results.len() - decoded,
            humantime::format_duration(elapsed),
            self.decoder,
            code_label(code.n(), code.num_checks()),
        );
        Ok(())
    }
}

fn parse_frames(text: &str, n: usize) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut frames = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let samples = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| format!("line {}: {}", idx + 1, e))?;
        if samples.len() != n {
            return Err(format!(
                "line {}: expected {} samples, found {}",
                idx + 1,
                n,
                samples.len()
            )
            .into());
        }
        frames.push(samples);
    }
    Ok(frames)
}

fn bit_string(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
}

fn code_label(n: usize, k: usize) -> String {
    format!("({n},{k}) code")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frames_parse_and_validate_length() {
        let frames = parse_frames("# two frames\n1.0 -2.0\n0.5 0.25\n", 2).unwrap();
        assert_eq!(frames, vec![vec![1.0, -2.0], vec![0.5, 0.25]]);
        assert!(parse_frames("1.0 2.0 3.0\n", 2).is_err());
        assert!(parse_frames("1.0 oops\n", 2).is_err());
    }

    #[test]
    fn bits_render_as_string() {
        assert_eq!(bit_string(&[0, 1, 1, 0]), "0110");
    }
}
