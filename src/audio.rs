//! Sound capability and its Web Audio backend
//!
//! The simulation never talks to audio directly. The frontend drains
//! [`GameEvent`]s and hands them to [`dispatch`], which drives whatever
//! [`AudioSink`] is installed. All sounds are synthesized; there are no
//! sample files.

use crate::sim::GameEvent;

/// Background melody (Hz), one note per [`NOTE_INTERVAL_MS`]
pub const MELODY: [f32; 8] = [
    523.25, 587.33, 659.25, 783.99, 659.25, 587.33, 523.25, 587.33,
];
pub const NOTE_INTERVAL_MS: f64 = 600.0;

/// Something that can make the game's noises
pub trait AudioSink {
    /// Short rising blip
    fn play_jump(&mut self);
    /// Long falling tone
    fn play_fall(&mut self);
    /// Start (or restart from the first note) the background loop
    fn start_music(&mut self);
    fn stop_music(&mut self);
    /// Advance time-driven output such as the music loop
    fn update(&mut self, _dt_ms: f64) {}
}

/// Route simulation events to sounds
pub fn dispatch(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::SessionStarted => sink.start_music(),
            GameEvent::Jumped { .. } => sink.play_jump(),
            GameEvent::Died { .. } => {
                sink.play_fall();
                sink.stop_music();
            }
            _ => {}
        }
    }
}

/// Step sequencer for the looping melody
#[derive(Debug, Clone, Default)]
pub struct MusicSequencer {
    playing: bool,
    next_note: usize,
    since_last_ms: f64,
}

impl MusicSequencer {
    /// Restart from the top; returns the first note to play now
    pub fn start(&mut self) -> f32 {
        self.playing = true;
        self.next_note = 1;
        self.since_last_ms = 0.0;
        MELODY[0]
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    #[cfg(test)]
    fn is_playing(&self) -> bool {
        self.playing
    }

    /// Notes that fall due within the next `dt_ms`
    pub fn advance(&mut self, dt_ms: f64) -> Vec<f32> {
        let mut due = Vec::new();
        if !self.playing {
            return due;
        }
        self.since_last_ms += dt_ms;
        while self.since_last_ms >= NOTE_INTERVAL_MS {
            self.since_last_ms -= NOTE_INTERVAL_MS;
            due.push(MELODY[self.next_note % MELODY.len()]);
            self.next_note = (self.next_note + 1) % MELODY.len();
        }
        due
    }
}

/// Silent sink for headless runs; logs what would have played
#[derive(Debug, Default)]
pub struct NullAudio {
    music: MusicSequencer,
}

impl AudioSink for NullAudio {
    fn play_jump(&mut self) {
        log::debug!("sfx: jump");
    }

    fn play_fall(&mut self) {
        log::debug!("sfx: fall");
    }

    fn start_music(&mut self) {
        let note = self.music.start();
        log::debug!("music: start ({} Hz)", note);
    }

    fn stop_music(&mut self) {
        self.music.stop();
        log::debug!("music: stop");
    }

    fn update(&mut self, dt_ms: f64) {
        for note in self.music.advance(dt_ms) {
            log::trace!("music: note {} Hz", note);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, MusicSequencer};
    use crate::Settings;

    /// Web Audio API backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        music: MusicSequencer,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                music: MusicSequencer::default(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Frequency sweep with an exponential fade
        fn sweep(&self, from: f32, to: f32, peak: f32, secs: f64) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = Self::create_osc(ctx, from, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + secs)
                .ok();
            gain.gain().set_value_at_time(vol * peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + secs)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + secs).ok();
        }

        fn play_note(&self, freq: f32) {
            let vol = self.music_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.08, t + 0.01)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play_jump(&mut self) {
            self.sweep(400.0, 600.0, 0.3, 0.1);
        }

        fn play_fall(&mut self) {
            self.sweep(400.0, 100.0, 0.4, 0.5);
        }

        fn start_music(&mut self) {
            self.resume();
            let note = self.music.start();
            self.play_note(note);
        }

        fn stop_music(&mut self) {
            self.music.stop();
        }

        fn update(&mut self, dt_ms: f64) {
            for note in self.music.advance(dt_ms) {
                self.play_note(note);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl AudioSink for Recorder {
        fn play_jump(&mut self) {
            self.calls.push("jump");
        }
        fn play_fall(&mut self) {
            self.calls.push("fall");
        }
        fn start_music(&mut self) {
            self.calls.push("start");
        }
        fn stop_music(&mut self) {
            self.calls.push("stop");
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut rec = Recorder::default();
        let events = [
            GameEvent::SessionStarted,
            GameEvent::Jumped {
                air: false,
                modifier: 1.0,
            },
            GameEvent::PlatformScored {
                platform_id: 1,
                points: 10,
            },
            GameEvent::Jumped {
                air: true,
                modifier: 1.0,
            },
            GameEvent::Died {
                cause: DeathCause::Spikes,
            },
        ];
        dispatch(&mut rec, &events);
        assert_eq!(rec.calls, vec!["start", "jump", "jump", "fall", "stop"]);
    }

    #[test]
    fn test_sequencer_cadence() {
        let mut seq = MusicSequencer::default();
        assert!(seq.advance(1000.0).is_empty());

        assert_eq!(seq.start(), 523.25);
        assert!(seq.advance(599.0).is_empty());
        assert_eq!(seq.advance(1.0), vec![587.33]);
        assert_eq!(seq.advance(1200.0), vec![659.25, 783.99]);
    }

    #[test]
    fn test_sequencer_wraps_and_stops() {
        let mut seq = MusicSequencer::default();
        seq.start();
        let notes = seq.advance(NOTE_INTERVAL_MS * 8.0);
        assert_eq!(notes.len(), 8);
        assert_eq!(notes[7], MELODY[0]);

        seq.stop();
        assert!(!seq.is_playing());
        assert!(seq.advance(5000.0).is_empty());
    }

    #[test]
    fn test_restart_begins_at_first_note() {
        let mut seq = MusicSequencer::default();
        seq.start();
        seq.advance(NOTE_INTERVAL_MS * 3.0);
        assert_eq!(seq.start(), MELODY[0]);
        assert_eq!(seq.advance(NOTE_INTERVAL_MS), vec![MELODY[1]]);
    }
}
