//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, Observer};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump off a platform
    Jump,
    /// Mid-air jump
    DoubleJump,
    /// Ordinary landing
    Land,
    /// Centered landing; pitch climbs with the streak
    Perfect(u32),
    /// Fever mode begins
    Fever,
    /// Jelly falls out of the world
    Shatter,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Jump { double: false } => SoundEffect::Jump,
            GameEvent::Jump { double: true } => SoundEffect::DoubleJump,
            GameEvent::Land => SoundEffect::Land,
            GameEvent::Perfect { streak } => SoundEffect::Perfect(streak),
            GameEvent::FeverStart => SoundEffect::Fever,
            GameEvent::Shatter => SoundEffect::Shatter,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
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

impl Observer for AudioManager {
    fn on_event(&mut self, event: GameEvent) {
        self.play(SoundEffect::for_event(event));
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Build from saved settings
    pub fn with_settings(settings: &crate::Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
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

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol, 300.0),
            SoundEffect::DoubleJump => self.play_jump(ctx, vol, 450.0),
            SoundEffect::Land => self.play_land(ctx, vol),
            SoundEffect::Perfect(streak) => self.play_perfect(ctx, vol, streak),
            SoundEffect::Fever => self.play_fever(ctx, vol),
            SoundEffect::Shatter => self.play_shatter(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Jump - springy upward sweep
    fn play_jump(&self, ctx: &AudioContext, vol: f32, base: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, base, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(base, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(base * 2.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Land - soft squelchy thump
    fn play_land(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Perfect - bright arpeggio, one semitone higher per streak step
    fn play_perfect(&self, ctx: &AudioContext, vol: f32, streak: u32) {
        let shift = 2f32.powf(streak.min(12) as f32 / 12.0);
        for (i, freq) in [660.0, 880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, freq * shift, OscillatorType::Triangle)
            {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Fever - rising fanfare with a wobbling sub
    fn play_fever(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sine) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency().set_value_at_time(130.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.2).ok();
            osc.frequency().set_value_at_time(140.0, t + 0.3).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }
    }

    /// Shatter - crackling noise burst over a falling tone
    fn play_shatter(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Noise: hop between far-apart frequencies
        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            for (i, freq) in [3500.0, 200.0, 4000.0, 150.0, 3000.0, 100.0, 2500.0, 80.0, 2000.0, 50.0]
                .iter()
                .enumerate()
            {
                osc.frequency()
                    .set_value_at_time(*freq, t + 0.01 + i as f64 * 0.02)
                    .ok();
            }
            osc.start().ok();
            osc.stop_with_when(t + 0.32).ok();
        }

        // Sad descending tone
        if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.8)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.9).ok();
        }
    }

    /// High score - celebratory
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}
