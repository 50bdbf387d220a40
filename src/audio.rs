//! Procedural sound effects
//!
//! Tiny synthesized cues rendered sample-by-sample into rodio buffers; no
//! asset files. Playback is fire-and-forget: sinks detach, and the
//! simulation loop never waits on the audio thread.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

const SAMPLE_RATE: u32 = 44_100;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Flap,
    /// Pipe pair passed
    Score,
    /// New best score
    HighScore,
    /// The bird hit something
    Hit,
}

/// Audio output handle; keeps the stream alive for the process lifetime
pub struct AudioManager {
    stream: Option<OutputStream>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Open the default output device. Failure is not fatal: the game
    /// simply plays silently.
    pub fn new() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Some(stream),
            Err(e) => {
                log::warn!("audio disabled: {e}");
                None
            }
        };
        Self {
            stream,
            muted: false,
        }
    }

    /// Mute/unmute all effects
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Queue a sound effect and return immediately
    pub fn play(&self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(stream) = &self.stream else { return };

        let samples = match effect {
            SoundEffect::Flap => sweep(420.0, 700.0, 0.09, 0.20),
            SoundEffect::Score => chime(&[(880.0, 0.06), (1320.0, 0.09)], 0.18),
            SoundEffect::HighScore => chime(&[(880.0, 0.07), (1100.0, 0.07), (1760.0, 0.12)], 0.2),
            // falling chirp, the classic thud
            SoundEffect::Hit => sweep(400.0, 80.0, 0.4, 0.25),
        };

        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach();
    }
}

/// Sine sweep from `f0` to `f1` Hz with a linear fade-out
fn sweep(f0: f32, f1: f32, secs: f32, amp: f32) -> Vec<f32> {
    let n = (secs * SAMPLE_RATE as f32) as usize;
    let mut phase = 0.0f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n.max(1) as f32;
            let freq = f0 + (f1 - f0) * t;
            phase += std::f32::consts::TAU * freq / SAMPLE_RATE as f32;
            phase.sin() * amp * (1.0 - t)
        })
        .collect()
}

/// A little arpeggio of pure tones, each with its own fade-out
fn chime(notes: &[(f32, f32)], amp: f32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &(freq, secs) in notes {
        let n = (secs * SAMPLE_RATE as f32) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let fade = 1.0 - i as f32 / n.max(1) as f32;
            samples.push((std::f32::consts::TAU * freq * t).sin() * amp * fade);
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_stays_within_amplitude() {
        for samples in [
            sweep(420.0, 700.0, 0.09, 0.2),
            sweep(400.0, 80.0, 0.4, 0.25),
            chime(&[(880.0, 0.06), (1320.0, 0.09)], 0.18),
        ] {
            assert!(!samples.is_empty());
            assert!(samples.iter().all(|s| s.abs() <= 0.25 + f32::EPSILON));
        }
    }
}
