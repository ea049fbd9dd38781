//! State of the sound: whether it's playing, its frequency and its gain. Mouse events change
//! this state on the event thread while a job on the audio worker reads it.

use crate::{config::SoundConfig, direction::Direction, worker::Worker};
use sounder_core::Var;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Identifies one period of playback, from turning the sound on until turning it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session(u64);

const PLAYING: u64 = 1;

impl Session {
    /// The session number shifted above the playing bit.
    fn packed(self, playing: bool) -> u64 {
        (self.0 << 1) | if playing { PLAYING } else { 0 }
    }
}

/// Sound state shared with the audio worker.
#[derive(Clone)]
pub struct SoundState {
    pub frequency_hz: Var<f32>,
    pub gain_db: Var<f32>,
    /// The current session and whether it's playing, packed so they always change together.
    session: Arc<AtomicU64>,
}

impl SoundState {
    fn new(frequency_hz: f32, gain_db: f32) -> Self {
        Self {
            frequency_hz: Var::new(frequency_hz),
            gain_db: Var::new(gain_db),
            session: Arc::new(AtomicU64::new(0)),
        }
    }

    /// True while the sound is on and no later session has started. Audio jobs poll this and
    /// return once it becomes false.
    pub fn is_current(&self, session: Session) -> bool {
        self.session.load(Ordering::SeqCst) == session.packed(true)
    }

    fn is_playing(&self) -> bool {
        self.session.load(Ordering::SeqCst) & PLAYING != 0
    }

    fn start(&self) -> Session {
        let next = |packed: u64| Session((packed >> 1) + 1);
        let (Ok(previous) | Err(previous)) = self.session.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |packed| Some(next(packed).packed(true)),
        );
        next(previous)
    }

    fn stop(&self) {
        self.session.fetch_and(!PLAYING, Ordering::SeqCst);
    }

    /// Turn the sound off, unless a later session has already replaced `session`.
    fn stop_session(&self, session: Session) {
        let _ = self.session.compare_exchange(
            session.packed(true),
            session.packed(false),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

/// Ends a session when dropped, so a session ends however its audio job finishes.
struct SessionGuard {
    state: SoundState,
    session: Session,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.stop_session(self.session);
    }
}

/// Something which makes the sound described by a `SoundState`. `play_audio` runs on the audio
/// worker and should return once `state.is_current(session)` is false. The session ends when
/// `play_audio` returns or panics.
pub trait Synth: Send + Sync + 'static {
    fn play_audio(&self, state: &SoundState, session: Session) -> anyhow::Result<()>;
}

pub struct SoundPlayer<S: Synth> {
    config: SoundConfig,
    state: SoundState,
    synth: Arc<S>,
    worker: Worker,
}

impl<S: Synth> SoundPlayer<S> {
    pub fn new(config: SoundConfig, synth: S) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SoundState::new(config.starting_frequency_hz, config.initial_gain_db),
            synth: Arc::new(synth),
            worker: Worker::new("sounder-audio")?,
        })
    }

    /// Change the volume or frequency of the sound in response to the mouse moving in
    /// `direction`.
    pub fn modify_sound(&self, direction: Direction) {
        match direction {
            Direction::Left => self.decr_frequency(),
            Direction::Right => self.incr_frequency(),
            Direction::Up => self.incr_gain(),
            Direction::Down => self.decr_gain(),
        }
    }

    pub fn decr_frequency(&self) {
        self.set_frequency(self.frequency() - self.config.frequency_delta_hz);
    }

    pub fn incr_frequency(&self) {
        self.set_frequency(self.frequency() + self.config.frequency_delta_hz);
    }

    pub fn frequency(&self) -> f32 {
        self.state.frequency_hz.get()
    }

    /// Values outside the configured range are clamped to it. Non-finite values are ignored.
    pub fn set_frequency(&self, frequency_hz: f32) {
        if !frequency_hz.is_finite() {
            log::error!("Invalid frequency passed to set_frequency. frequency={}", frequency_hz);
            return;
        }
        self.state.frequency_hz.set(
            frequency_hz.clamp(self.config.min_frequency_hz, self.config.max_frequency_hz),
        );
    }

    pub fn decr_gain(&self) {
        self.set_gain(self.gain() - self.config.gain_delta_db);
    }

    pub fn incr_gain(&self) {
        self.set_gain(self.gain() + self.config.gain_delta_db);
    }

    /// Gain in decibels relative to full scale.
    pub fn gain(&self) -> f32 {
        self.state.gain_db.get()
    }

    /// Values outside the configured range are clamped to it. Non-finite values are ignored.
    pub fn set_gain(&self, gain_db: f32) {
        if !gain_db.is_finite() {
            log::error!("Invalid gain passed to set_gain. gain={}", gain_db);
            return;
        }
        self.state
            .gain_db
            .set(gain_db.clamp(self.config.min_gain_db, self.config.max_gain_db));
    }

    pub fn is_sound_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Turn the sound off if it's playing, otherwise turn it on by submitting a job to the audio
    /// worker. The event thread never waits for audio.
    pub fn toggle_sound(&self) {
        if self.state.is_playing() {
            self.state.stop();
            log::debug!("sound off");
            return;
        }
        let session = self.state.start();
        log::debug!("sound on ({:?})", session);
        let state = self.state.clone();
        let synth = Arc::clone(&self.synth);
        let submitted = self.worker.submit(move || {
            let guard = SessionGuard { state, session };
            if let Err(e) = synth.play_audio(&guard.state, session) {
                log::error!("audio playback failed: {:#}", e);
            }
        });
        if let Err(e) = submitted {
            log::error!("can't start audio playback: {:#}", e);
            self.state.stop_session(session);
        }
    }
}

impl<S: Synth> Drop for SoundPlayer<S> {
    fn drop(&mut self) {
        // lets the worker's current job finish so the worker can be joined
        self.state.stop();
    }
}
