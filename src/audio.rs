//! Audio model handed to the host
//!
//! The core never touches an audio device. It decides *what* should be heard
//! and queues `AudioCommand`s; the host drains them each frame and plays the
//! matching sound handles.

use crate::consts::{BOOM_CHAIN_DELAY, BOOM_CHAIN_MAX_CUES, MUSIC_FADE_DURATION};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Menu selection moved
    MenuMove,
    /// Menu item activated
    MenuSelect,
    /// Countdown number appeared
    CountdownTick,
    /// Player took contact damage
    PlayerHit,
    /// Power-up collected
    PowerUpPickup,
    /// Boom detonation
    ExplosionMain,
    /// One asteroid in a boom chain
    AsteroidDestroyed,
    /// Player destroyed
    GameOver,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    Gameplay,
    GameOver,
}

/// Instructions for the host's audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    /// Fire-and-forget effect at the given volume
    Play { cue: SoundCue, volume: f32 },
    /// Start a looping track (at the given volume)
    StartMusic { track: MusicTrack, volume: f32 },
    /// Adjust a playing track's volume
    MusicVolume { track: MusicTrack, volume: f32 },
    StopMusic { track: MusicTrack },
}

/// Outgoing track fades 1 -> 0 while the incoming track fades 0 -> 1
#[derive(Debug, Clone, PartialEq)]
pub struct MusicCrossfade {
    pub from: Option<MusicTrack>,
    pub to: MusicTrack,
    elapsed: f32,
    duration: f32,
}

impl MusicCrossfade {
    pub fn new(from: Option<MusicTrack>, to: MusicTrack, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.001),
        }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// `(outgoing, incoming)` gain multipliers
    pub fn gains(&self) -> (f32, f32) {
        let t = self.progress();
        (1.0 - t, t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}

/// Cues waiting on a delay (boom chain cadence)
#[derive(Debug, Clone, Default)]
pub struct CueScheduler {
    pending: Vec<(f32, SoundCue)>,
}

impl CueScheduler {
    pub fn schedule(&mut self, cue: SoundCue, delay: f32) {
        self.pending.push((delay.max(0.0), cue));
    }

    /// Queue `count` cues (capped) spaced `spacing` apart, the first one
    /// `spacing` from now
    pub fn schedule_chain(&mut self, cue: SoundCue, count: usize, spacing: f32) {
        for i in 0..count.min(BOOM_CHAIN_MAX_CUES) {
            self.schedule(cue, spacing * (i + 1) as f32);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Advance and return the cues that came due, in scheduling order
    pub fn update(&mut self, dt: f32) -> Vec<SoundCue> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(delay, cue)| {
            *delay -= dt;
            if *delay <= 0.0 {
                due.push(*cue);
                false
            } else {
                true
            }
        });
        due
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
    crossfade: Option<MusicCrossfade>,
    scheduler: CueScheduler,
    outbox: Vec<AudioCommand>,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioMixer {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            current_track: None,
            crossfade: None,
            scheduler: CueScheduler::default(),
            outbox: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if muted {
            self.scheduler.clear();
        }
        self.refresh_music_volume();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    pub fn crossfade(&self) -> Option<&MusicCrossfade> {
        self.crossfade.as_ref()
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Queue a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        let volume = self.effective_sfx_volume();
        if volume <= 0.0 {
            return;
        }
        self.outbox.push(AudioCommand::Play { cue, volume });
    }

    /// Queue the destruction cues of a boom chain
    pub fn play_chain(&mut self, cue: SoundCue, count: usize) {
        if !self.muted {
            self.scheduler.schedule_chain(cue, count, BOOM_CHAIN_DELAY);
        }
    }

    /// Start a track immediately (no fade)
    pub fn start_music(&mut self, track: MusicTrack) {
        if let Some(old) = self.current_track.take() {
            self.outbox.push(AudioCommand::StopMusic { track: old });
        }
        if let Some(fade) = self.crossfade.take() {
            if let Some(from) = fade.from {
                self.outbox.push(AudioCommand::StopMusic { track: from });
            }
        }
        self.current_track = Some(track);
        let volume = self.effective_music_volume();
        self.outbox.push(AudioCommand::StartMusic { track, volume });
    }

    /// Crossfade from whatever is playing to `track`
    pub fn crossfade_to(&mut self, track: MusicTrack) {
        self.crossfade_to_over(track, MUSIC_FADE_DURATION);
    }

    pub fn crossfade_to_over(&mut self, track: MusicTrack, duration: f32) {
        if self.current_track == Some(track) && self.crossfade.is_none() {
            return;
        }
        // A fade already running is cut short: its outgoing track stops now
        if let Some(fade) = self.crossfade.take() {
            if let Some(from) = fade.from {
                self.outbox.push(AudioCommand::StopMusic { track: from });
            }
            if fade.to == track {
                self.current_track = Some(track);
                self.refresh_music_volume();
                return;
            }
        }
        log::debug!("Music crossfade {:?} -> {:?}", self.current_track, track);
        let from = self.current_track.replace(track);
        self.outbox.push(AudioCommand::StartMusic { track, volume: 0.0 });
        self.crossfade = Some(MusicCrossfade::new(from, track, duration));
    }

    /// Advance the crossfade and any delayed cues
    pub fn update(&mut self, dt: f32) {
        for cue in self.scheduler.update(dt) {
            self.play(cue);
        }

        let Some(fade) = self.crossfade.as_mut() else {
            return;
        };
        fade.advance(dt);
        let (out_gain, in_gain) = fade.gains();
        let (from, to, finished) = (fade.from, fade.to, fade.is_finished());
        let volume = self.effective_music_volume();

        if let Some(from) = from {
            if finished {
                self.outbox.push(AudioCommand::StopMusic { track: from });
            } else {
                self.outbox.push(AudioCommand::MusicVolume {
                    track: from,
                    volume: volume * out_gain,
                });
            }
        }
        self.outbox.push(AudioCommand::MusicVolume {
            track: to,
            volume: volume * in_gain,
        });
        if finished {
            self.crossfade = None;
        }
    }

    /// Commands queued since the last drain
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn refresh_music_volume(&mut self) {
        if self.crossfade.is_some() {
            // Picked up on the next update
            return;
        }
        if let Some(track) = self.current_track {
            let volume = self.effective_music_volume();
            self.outbox.push(AudioCommand::MusicVolume { track, volume });
        }
    }
}
