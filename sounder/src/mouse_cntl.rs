use crate::{
    direction::{determine_direction, Direction},
    info_area::InfoArea,
    sound_player::{SoundPlayer, Synth},
};
use sounder_interactive::{MouseButton, MouseEvent, MouseListener};
use std::{borrow::Cow, iter};

/// Turns mouse events into changes to the sound. Moving the mouse left or right changes the
/// frequency, up or down changes the gain, and a left click starts or stops the sound.
pub struct MouseCntl<S: Synth> {
    player: SoundPlayer<S>,
    info: InfoArea,
    last_position: Option<MouseEvent>,
    direction_of_movement: Option<Direction>,
}

impl<S: Synth> MouseCntl<S> {
    pub fn new(player: SoundPlayer<S>, info: InfoArea) -> Self {
        Self {
            player,
            info,
            last_position: None,
            direction_of_movement: None,
        }
    }

    pub fn player(&self) -> &SoundPlayer<S> {
        &self.player
    }

    pub fn info(&self) -> &InfoArea {
        &self.info
    }

    pub fn direction_of_movement(&self) -> Option<Direction> {
        self.direction_of_movement
    }

    /// The current state of the sound.
    fn status(&self) -> String {
        format!(
            "{:.0}Hz {:.1}dB {}",
            self.player.frequency(),
            self.player.gain(),
            if self.player.is_sound_playing() {
                "playing"
            } else {
                "stopped"
            }
        )
    }
}

impl<S: Synth> MouseListener for MouseCntl<S> {
    fn mouse_moved(&mut self, event: MouseEvent) {
        self.info.add("Mouse was moved");
        // Nothing to compare against on the first movement.
        if let Some(last_position) = self.last_position.take() {
            let direction = determine_direction(&event, &last_position);
            self.direction_of_movement = Some(direction);
            self.info.add(format!("...moved {}", direction));
        }
        self.last_position = Some(event);
        if let Some(direction) = self.direction_of_movement {
            self.player.modify_sound(direction);
        }
    }

    fn mouse_dragged(&mut self, _event: MouseEvent) {
        self.info.add("Mouse was dragged");
    }

    fn mouse_clicked(&mut self, event: MouseEvent) {
        self.info.add("Mouse was clicked");
        if event.button == Some(MouseButton::Left) {
            self.info.add("...left button");
            self.player.toggle_sound();
        }
    }

    fn mouse_wheel_moved(&mut self, _event: MouseEvent, _delta: i32) {
        self.info.add("Mouse wheel was moved");
    }

    fn info_lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.info
            .lines()
            .map(Cow::Borrowed)
            .chain(iter::once(Cow::Owned(self.status())))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::SoundConfig,
        sound_player::{Session, SoundState},
    };
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::{Duration, Instant},
    };

    /// Counts playback requests without touching audio hardware. Plays until the session ends
    /// unless it's set to fail.
    struct CountingSynth {
        requests: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Synth for CountingSynth {
        fn play_audio(&self, state: &SoundState, session: Session) -> anyhow::Result<()> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("no output device");
            }
            while state.is_current(session) {
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        }
    }

    fn mouse_cntl_with(fail: bool) -> (MouseCntl<CountingSynth>, Arc<AtomicUsize>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let synth = CountingSynth {
            requests: Arc::clone(&requests),
            fail,
        };
        let player = SoundPlayer::new(SoundConfig::default(), synth).unwrap();
        (MouseCntl::new(player, InfoArea::new(64)), requests)
    }

    fn mouse_cntl() -> MouseCntl<CountingSynth> {
        mouse_cntl_with(false).0
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn status(mouse_cntl: &MouseCntl<CountingSynth>) -> String {
        mouse_cntl.info_lines().last().unwrap().into_owned()
    }

    fn click(button: MouseButton) -> MouseEvent {
        MouseEvent {
            x: 0,
            y: 0,
            button: Some(button),
            click_count: 1,
        }
    }

    #[test]
    fn first_movement_has_no_direction() {
        let mut mouse_cntl = mouse_cntl();
        mouse_cntl.mouse_moved(MouseEvent::at(10, 10));
        assert_eq!(mouse_cntl.direction_of_movement(), None);
        assert_eq!(mouse_cntl.info().lines().collect::<Vec<_>>(), vec!["Mouse was moved"]);
        assert_eq!(mouse_cntl.player().gain(), -20.0);
        assert_eq!(mouse_cntl.player().frequency(), 400.0);
    }

    #[test]
    fn movement_changes_sound() {
        let mut mouse_cntl = mouse_cntl();
        mouse_cntl.mouse_moved(MouseEvent::at(10, 10));
        mouse_cntl.mouse_moved(MouseEvent::at(10, 5));
        assert_eq!(mouse_cntl.direction_of_movement(), Some(Direction::Up));
        assert_eq!(mouse_cntl.player().gain(), -19.5);
        mouse_cntl.mouse_moved(MouseEvent::at(30, 6));
        assert_eq!(mouse_cntl.direction_of_movement(), Some(Direction::Right));
        assert_eq!(mouse_cntl.player().frequency(), 420.0);
        assert_eq!(
            mouse_cntl.info().lines().collect::<Vec<_>>(),
            vec![
                "Mouse was moved",
                "Mouse was moved",
                "...moved UP",
                "Mouse was moved",
                "...moved RIGHT",
            ]
        );
        assert_eq!(status(&mouse_cntl), "420Hz -19.5dB stopped");
    }

    #[test]
    fn left_click_toggles_sound() {
        let (mut mouse_cntl, requests) = mouse_cntl_with(false);
        mouse_cntl.mouse_clicked(click(MouseButton::Left));
        assert!(mouse_cntl.player().is_sound_playing());
        assert!(status(&mouse_cntl).ends_with("playing"));
        wait_until(|| requests.load(Ordering::SeqCst) == 1);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        mouse_cntl.mouse_clicked(click(MouseButton::Left));
        assert!(!mouse_cntl.player().is_sound_playing());
        assert!(status(&mouse_cntl).ends_with("stopped"));
    }

    #[test]
    fn status_shows_failed_playback_as_stopped() {
        let (mut mouse_cntl, requests) = mouse_cntl_with(true);
        mouse_cntl.mouse_clicked(click(MouseButton::Left));
        wait_until(|| !mouse_cntl.player().is_sound_playing());
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert!(status(&mouse_cntl).ends_with("stopped"));
    }

    #[test]
    fn other_buttons_only_report_the_click() {
        let (mut mouse_cntl, requests) = mouse_cntl_with(false);
        mouse_cntl.mouse_clicked(click(MouseButton::Right));
        assert!(!mouse_cntl.player().is_sound_playing());
        assert_eq!(mouse_cntl.info().lines().collect::<Vec<_>>(), vec!["Mouse was clicked"]);
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drag_and_wheel_are_reported() {
        let mut mouse_cntl = mouse_cntl();
        mouse_cntl.mouse_dragged(click(MouseButton::Left));
        mouse_cntl.mouse_wheel_moved(MouseEvent::at(0, 0), -1);
        mouse_cntl.mouse_pressed(click(MouseButton::Left));
        assert_eq!(
            mouse_cntl.info().lines().collect::<Vec<_>>(),
            vec!["Mouse was dragged", "Mouse wheel was moved"]
        );
        assert!(!mouse_cntl.player().is_sound_playing());
    }
}
