//! Audio system
//!
//! The session talks to an [`AudioSink`]; in the browser that's the
//! [`AudioManager`], which synthesizes every effect with the Web Audio API
//! (no sample files). Playback is fire-and-forget: a failed sound never
//! reaches the simulation.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Keystroke launched a projectile
    Gun,
    /// Projectile struck a word
    Shot,
    /// A word blew up
    Explosion,
    /// Chime after a word is shot down
    Correct,
    /// Buzz after a word escapes
    Wrong,
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Silent sink (native builds, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio backed sink
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
    }

    impl AudioManager {
        pub fn new(master_volume: f32, sfx_volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: master_volume.clamp(0.0, 1.0),
                sfx_volume: sfx_volume.clamp(0.0, 1.0),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            self.master_volume * self.sfx_volume
        }

        fn create_osc(
            &self,
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

        /// Short square-wave pop dropping in pitch
        fn play_gun(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.06)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Dull tap on impact
        fn play_shot(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.07)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.07)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Falling sawtooth boom with a high crack on top
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Rising two-note chime
        fn play_correct(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0, 990.0].iter().enumerate() {
                let delay = i as f64 * 0.09;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// Low descending buzz
        fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.45)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency().set_value_at_time(150.0, t + 0.15).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.45)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Gun => self.play_gun(ctx, vol),
                SoundEffect::Shot => self.play_shot(ctx, vol),
                SoundEffect::Explosion => self.play_explosion(ctx, vol),
                SoundEffect::Correct => self.play_correct(ctx, vol),
                SoundEffect::Wrong => self.play_wrong(ctx, vol),
            }
        }
    }
}
