//! Sound cue playback
//!
//! Cues are synthesized with Web Audio oscillators in the browser, so no
//! sample files are needed. Native builds are silent. Nothing here can fail
//! loudly: every Web Audio error is dropped on the floor.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::SoundCue;

/// Audio manager for the game. Created once by the shell.
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play every cue of a step, in order
    pub fn play_all(&self, cues: &[SoundCue]) {
        for &cue in cues {
            self.play(cue);
        }
    }

    /// Play a single cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.dispatch(cue, vol);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch(&self, cue: SoundCue, vol: f32) {
        log::trace!("Sound cue {:?} at volume {:.2} (no audio backend)", cue, vol);
    }

    #[cfg(target_arch = "wasm32")]
    fn dispatch(&self, cue: SoundCue, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Jump => self.play_jump(ctx, vol),
            SoundCue::Coin => self.play_coin(ctx, vol),
            SoundCue::Stomp => self.play_stomp(ctx, vol),
            SoundCue::Hurt => self.play_hurt(ctx, vol),
            SoundCue::LevelComplete => self.play_level_complete(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
        }
    }
}

// === Sound generators ===
#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Create an oscillator with gain envelope
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

    /// Short note starting at `start` seconds from now
    fn note(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        vol: f32,
        start: f64,
        len: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + start;

        gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + len)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }

    /// Jump - quick upward chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.16).ok();
    }

    /// Coin - two bright tones
    fn play_coin(&self, ctx: &AudioContext, vol: f32) {
        self.note(ctx, 988.0, OscillatorType::Square, vol * 0.2, 0.0, 0.07);
        self.note(ctx, 1319.0, OscillatorType::Square, vol * 0.2, 0.07, 0.2);
    }

    /// Stomp - low squashed thump
    fn play_stomp(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.14).ok();
    }

    /// Hurt - harsh falling buzz
    fn play_hurt(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.32).ok();
    }

    /// Level complete - rising major arpeggio
    fn play_level_complete(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
            let len = if i == 3 { 0.4 } else { 0.12 };
            self.note(ctx, freq, OscillatorType::Triangle, vol * 0.3, i as f64 * 0.1, len);
        }
    }

    /// Game over - slow descending tones
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 330.0, 262.0, 196.0].into_iter().enumerate() {
            self.note(ctx, freq, OscillatorType::Sine, vol * 0.35, i as f64 * 0.25, 0.3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.8,
            ..Default::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        assert!((audio.effective_volume() - 0.4).abs() < 1e-6);

        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(1.0);
        assert_eq!(audio.effective_volume(), 1.0);
    }

    #[test]
    fn test_playing_without_backend_is_harmless() {
        let audio = AudioManager::new();
        audio.resume();
        audio.play_all(&[
            SoundCue::Jump,
            SoundCue::Coin,
            SoundCue::Stomp,
            SoundCue::Hurt,
            SoundCue::LevelComplete,
            SoundCue::GameOver,
        ]);
    }
}
