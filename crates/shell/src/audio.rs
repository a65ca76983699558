use std::sync::Arc;

use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};
use tracing::warn;

pub const SAMPLE_RATE: u32 = 44_100;

/// A shell interaction sound, synthesized once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Rising sine played when a variant switch lands.
    Switch,
    /// Falling square played on clicks.
    Click,
}

impl Cue {
    const COUNT: usize = 2;

    fn index(self) -> usize {
        match self {
            Self::Switch => 0,
            Self::Click => 1,
        }
    }

    fn spec(self) -> CueSpec {
        match self {
            Self::Switch => CueSpec {
                start_hz: 440.0,
                end_hz: 880.0,
                start_gain: 0.1,
                end_gain: 0.01,
                seconds: 0.3,
                square: false,
            },
            Self::Click => CueSpec {
                start_hz: 880.0,
                end_hz: 440.0,
                start_gain: 0.05,
                end_gain: 0.01,
                seconds: 0.2,
                square: true,
            },
        }
    }
}

struct CueSpec {
    start_hz: f32,
    end_hz: f32,
    start_gain: f32,
    end_gain: f32,
    seconds: f32,
    square: bool,
}

/// Renders one cue to mono samples. Frequency and gain both follow
/// exponential ramps; phase is integrated so the sweep stays continuous.
pub fn render_cue(cue: Cue, sample_rate: u32) -> Vec<f32> {
    let spec = cue.spec();
    let count = (spec.seconds * sample_rate as f32) as usize;
    let mut samples = Vec::with_capacity(count);
    let mut phase = 0.0_f32;
    for i in 0..count {
        let k = i as f32 / count as f32;
        let hz = spec.start_hz * (spec.end_hz / spec.start_hz).powf(k);
        let gain = spec.start_gain * (spec.end_gain / spec.start_gain).powf(k);
        phase += std::f32::consts::TAU * hz / sample_rate as f32;
        let wave = if spec.square {
            phase.sin().signum()
        } else {
            phase.sin()
        };
        samples.push(wave * gain);
    }
    samples
}

struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Plays pre-rendered cues through the default output device.
///
/// A missing or disabled device downgrades playback to a no-op, so headless
/// runs and machines without audio keep working.
pub struct CuePlayer {
    output: Option<AudioOutput>,
    cues: [Arc<[f32]>; Cue::COUNT],
}

impl CuePlayer {
    pub fn new(enabled: bool) -> Self {
        let output = if enabled {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(AudioOutput {
                    _stream: stream,
                    handle,
                }),
                Err(error) => {
                    warn!(%error, "audio output unavailable, cues disabled");
                    None
                }
            }
        } else {
            None
        };
        Self {
            output,
            cues: [
                render_cue(Cue::Switch, SAMPLE_RATE).into(),
                render_cue(Cue::Click, SAMPLE_RATE).into(),
            ],
        }
    }

    pub fn is_active(&self) -> bool {
        self.output.is_some()
    }

    /// Fire-and-forget playback on a detached sink.
    pub fn play(&self, cue: Cue) {
        let Some(output) = &self.output else {
            return;
        };
        let Ok(sink) = Sink::try_new(&output.handle) else {
            return;
        };
        sink.append(SamplesBuffer::new(
            1,
            SAMPLE_RATE,
            self.cues[cue.index()].to_vec(),
        ));
        sink.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_span_their_documented_lengths() {
        assert_eq!(render_cue(Cue::Switch, SAMPLE_RATE).len(), 13_230);
        assert_eq!(render_cue(Cue::Click, SAMPLE_RATE).len(), 8_820);
    }

    #[test]
    fn amplitude_stays_within_the_gain_envelope() {
        for sample in render_cue(Cue::Switch, SAMPLE_RATE) {
            assert!(sample.abs() <= 0.1 + 1e-6);
        }
        for sample in render_cue(Cue::Click, SAMPLE_RATE) {
            assert!(sample.abs() <= 0.05 + 1e-6);
        }
    }

    #[test]
    fn envelope_decays_toward_the_tail() {
        let samples = render_cue(Cue::Switch, SAMPLE_RATE);
        let head: f32 = samples[..1_000].iter().map(|s| s.abs()).sum();
        let tail: f32 = samples[samples.len() - 1_000..].iter().map(|s| s.abs()).sum();
        assert!(head > tail * 2.0);
    }

    #[test]
    fn click_cue_rides_the_square_wave_rails() {
        let samples = render_cue(Cue::Click, SAMPLE_RATE);
        assert!((samples[0].abs() - 0.05).abs() < 1e-3);
    }

    #[test]
    fn disabled_player_swallows_playback() {
        let player = CuePlayer::new(false);
        assert!(!player.is_active());
        player.play(Cue::Click);
    }
}
