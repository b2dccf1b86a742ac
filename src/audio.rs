//! Sound effects
//!
//! The simulation never plays audio. After each step the driver drains the
//! event queue and hands it to [`dispatch`], which maps events to effects and
//! forwards them to an [`AudioSink`]. Playback is fire-and-forget: a sink may
//! fail silently and nothing is reported back.

use crate::sim::{DamageCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot
    BulletFired,
    /// Player survived an enemy bullet
    PlayerHit,
    /// Mega blast
    SpecialAttack,
    /// Session ended
    GameOver,
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Which sound, if any, an event should trigger.
///
/// The hit blip only plays for bullet hits the ship survives, so it never
/// overlaps the game-over chime.
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::BulletFired { .. } => Some(SoundEffect::BulletFired),
        GameEvent::SpecialAttack => Some(SoundEffect::SpecialAttack),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        GameEvent::PlayerHit {
            cause: DamageCause::Bullet,
            lives_left,
        } if *lives_left > 0 => Some(SoundEffect::PlayerHit),
        _ => None,
    }
}

/// Play the sounds for a batch of drained events, in order
pub fn dispatch(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for effect in events.iter().filter_map(sound_for) {
        sink.play(effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    //! WebAudio backend
    //!
    //! Prefers the page's `<audio>` elements and falls back to oscillator
    //! synthesis. Every call swallows its errors.

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        AudioContext, AudioContextState, GainNode, HtmlAudioElement, OscillatorNode,
        OscillatorType,
    };

    use super::{AudioSink, SoundEffect};

    /// Audio manager for the web shell
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        bullet: Option<HtmlAudioElement>,
        mega: Option<HtmlAudioElement>,
        game_over: Option<HtmlAudioElement>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    fn audio_element(id: &str) -> Option<HtmlAudioElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlAudioElement>()
            .ok()
    }

    /// Await a playback promise so a rejection (autoplay policy) is handled
    /// instead of surfacing as an uncaught error
    fn settle_quietly(promise: js_sys::Promise) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                log::debug!("Audio promise rejected: {:?}", err);
            }
        });
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - synthesized sounds disabled");
            }
            Self {
                ctx,
                bullet: audio_element("sfxBullet"),
                mega: audio_element("sfxMega"),
                game_over: audio_element("sfxGameOver"),
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Resume the context (browsers require a user gesture)
        pub fn unlock(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    if let Ok(promise) = ctx.resume() {
                        settle_quietly(promise);
                    }
                }
            }
        }

        pub fn set_volumes(&mut self, master: f32, sfx: f32, muted: bool) {
            self.master_volume = master.clamp(0.0, 1.0);
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Restart an `<audio>` element. Returns false if there is none.
        fn play_element(element: Option<&HtmlAudioElement>, vol: f32) -> bool {
            let Some(el) = element else {
                return false;
            };
            el.set_volume(vol as f64);
            el.set_current_time(0.0);
            match el.play() {
                Ok(promise) => {
                    settle_quietly(promise);
                    true
                }
                Err(_) => false,
            }
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

        /// Short falling square blip
        fn synth_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 620.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time() + 0.005;

            gain.gain().set_value_at_time(vol * 0.03, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.00001, t + 0.14)
                .ok();
            osc.frequency().set_value_at_time(620.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(360.0, t + 0.12)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.16).ok();
        }

        /// Two high beeps then three rising notes
        fn synth_game_over(&self, ctx: &AudioContext, vol: f32) {
            const STEP: f64 = 0.14;
            let notes = [
                (880.0, 0.12, OscillatorType::Square, 0.05),
                (880.0, 0.12, OscillatorType::Square, 0.05),
                (660.0, 0.12, OscillatorType::Triangle, 0.045),
                (740.0, 0.12, OscillatorType::Triangle, 0.045),
                (830.0, 0.2, OscillatorType::Triangle, 0.05),
            ];
            let t0 = ctx.current_time() + 0.02;
            for (i, (freq, dur, osc_type, peak)) in notes.into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                    continue;
                };
                let t = t0 + i as f64 * STEP;
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(vol * peak, t + 0.012)
                    .ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.00001, t + dur)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + dur + 0.02).ok();
            }
        }

        /// Rising sawtooth sweep when the page has no mega clip
        fn synth_mega(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            self.unlock();

            match effect {
                // The shot only ever uses the page clip
                SoundEffect::BulletFired => {
                    Self::play_element(self.bullet.as_ref(), vol);
                }
                SoundEffect::SpecialAttack => {
                    if !Self::play_element(self.mega.as_ref(), vol) {
                        if let Some(ctx) = &self.ctx {
                            self.synth_mega(ctx, vol);
                        }
                    }
                }
                SoundEffect::GameOver => {
                    if !Self::play_element(self.game_over.as_ref(), vol) {
                        if let Some(ctx) = &self.ctx {
                            self.synth_game_over(ctx, vol);
                        }
                    }
                }
                SoundEffect::PlayerHit => {
                    if let Some(ctx) = &self.ctx {
                        self.synth_hit(ctx, vol);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Weapon;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    #[test]
    fn test_hit_sound_policy() {
        let survived = GameEvent::PlayerHit {
            cause: DamageCause::Bullet,
            lives_left: 1,
        };
        let lethal = GameEvent::PlayerHit {
            cause: DamageCause::Bullet,
            lives_left: 0,
        };
        let rammed = GameEvent::PlayerHit {
            cause: DamageCause::Enemy,
            lives_left: 2,
        };
        assert_eq!(sound_for(&survived), Some(SoundEffect::PlayerHit));
        assert_eq!(sound_for(&lethal), None);
        assert_eq!(sound_for(&rammed), None);
    }

    #[test]
    fn test_dispatch_in_order() {
        let events = vec![
            GameEvent::BulletFired { muzzle: Vec2::ZERO },
            GameEvent::EnemyDestroyed {
                weapon: Weapon::Bullet,
                at: Vec2::ZERO,
            },
            GameEvent::SpecialAttack,
            GameEvent::PlayerHit {
                cause: DamageCause::Bullet,
                lives_left: 0,
            },
            GameEvent::GameOver { score: 40, level: 1 },
        ];
        let mut sink = Recorder::default();
        dispatch(&events, &mut sink);
        assert_eq!(
            sink.0,
            vec![
                SoundEffect::BulletFired,
                SoundEffect::SpecialAttack,
                SoundEffect::GameOver
            ]
        );

        // Null sink accepts anything
        dispatch(&events, &mut NullAudio);
    }
}
