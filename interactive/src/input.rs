use sdl2::{
    event::{Event, WindowEvent},
    mouse::{MouseButton as SdlMouseButton, MouseState, MouseWheelDirection},
};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_sdl(mouse_button: SdlMouseButton) -> Option<Self> {
        match mouse_button {
            SdlMouseButton::Left => Some(Self::Left),
            SdlMouseButton::Right => Some(Self::Right),
            SdlMouseButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

/// A mouse event in window pixel coordinates. `button` is set for press, release and click
/// events and for drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub button: Option<MouseButton>,
    pub click_count: u8,
}

impl MouseEvent {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: None,
            click_count: 0,
        }
    }

    fn with_button(self, button: MouseButton, click_count: u8) -> Self {
        Self {
            button: Some(button),
            click_count,
            ..self
        }
    }
}

/// Receives mouse events from a `Window`. All handlers default to doing nothing.
pub trait MouseListener {
    /// The mouse moved with no buttons held.
    fn mouse_moved(&mut self, _event: MouseEvent) {}

    /// The mouse moved with a button held.
    fn mouse_dragged(&mut self, _event: MouseEvent) {}

    /// A button was pressed and released without the mouse moving in between.
    fn mouse_clicked(&mut self, _event: MouseEvent) {}

    fn mouse_pressed(&mut self, _event: MouseEvent) {}

    fn mouse_released(&mut self, _event: MouseEvent) {}

    fn mouse_entered(&mut self, _event: MouseEvent) {}

    fn mouse_exited(&mut self, _event: MouseEvent) {}

    /// Positive `delta` is a rotation away from the user.
    fn mouse_wheel_moved(&mut self, _event: MouseEvent, _delta: i32) {}

    /// Lines of text to draw in the window, oldest first. Called once per frame.
    fn info_lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::empty()
    }
}

/// The subset of SDL events that concern the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawMouseEvent {
    Motion {
        x: i32,
        y: i32,
        button_held: Option<MouseButton>,
    },
    ButtonDown {
        button: MouseButton,
        x: i32,
        y: i32,
        clicks: u8,
    },
    ButtonUp {
        button: MouseButton,
        x: i32,
        y: i32,
        clicks: u8,
    },
    Wheel {
        delta: i32,
    },
    Entered,
    Exited,
}

fn first_button_held(mousestate: &MouseState) -> Option<MouseButton> {
    if mousestate.left() {
        Some(MouseButton::Left)
    } else if mousestate.right() {
        Some(MouseButton::Right)
    } else if mousestate.middle() {
        Some(MouseButton::Middle)
    } else {
        None
    }
}

impl RawMouseEvent {
    pub(crate) fn from_sdl(event: &Event) -> Option<Self> {
        match event {
            Event::MouseMotion {
                mousestate, x, y, ..
            } => Some(Self::Motion {
                x: *x,
                y: *y,
                button_held: first_button_held(mousestate),
            }),
            Event::MouseButtonDown {
                mouse_btn,
                clicks,
                x,
                y,
                ..
            } => MouseButton::from_sdl(*mouse_btn).map(|button| {
                Self::ButtonDown {
                    button,
                    x: *x,
                    y: *y,
                    clicks: *clicks,
                }
            }),
            Event::MouseButtonUp {
                mouse_btn,
                clicks,
                x,
                y,
                ..
            } => MouseButton::from_sdl(*mouse_btn).map(|button| {
                Self::ButtonUp {
                    button,
                    x: *x,
                    y: *y,
                    clicks: *clicks,
                }
            }),
            Event::MouseWheel { y, direction, .. } => Some(Self::Wheel {
                delta: match direction {
                    MouseWheelDirection::Flipped => -*y,
                    _ => *y,
                },
            }),
            Event::Window {
                win_event: WindowEvent::Enter,
                ..
            } => Some(Self::Entered),
            Event::Window {
                win_event: WindowEvent::Leave,
                ..
            } => Some(Self::Exited),
            _ => None,
        }
    }
}

/// Turns raw mouse events into calls on a `MouseListener`. Clicks are synthesized from a press
/// and release of the same button at the same position.
#[derive(Debug, Default)]
pub(crate) struct MouseDispatcher {
    pressed_at: [Option<(i32, i32)>; 3],
    position: (i32, i32),
}

impl MouseDispatcher {
    pub(crate) fn position(&self) -> (i32, i32) {
        self.position
    }

    pub(crate) fn dispatch<L: MouseListener>(
        &mut self,
        raw: RawMouseEvent,
        listener: &mut L,
    ) {
        match raw {
            RawMouseEvent::Motion { x, y, button_held } => {
                self.position = (x, y);
                let event = MouseEvent::at(x, y);
                match button_held {
                    Some(button) => {
                        listener.mouse_dragged(event.with_button(button, 0))
                    }
                    None => listener.mouse_moved(event),
                }
            }
            RawMouseEvent::ButtonDown {
                button,
                x,
                y,
                clicks,
            } => {
                self.position = (x, y);
                self.pressed_at[button.index()] = Some((x, y));
                listener.mouse_pressed(
                    MouseEvent::at(x, y).with_button(button, clicks),
                );
            }
            RawMouseEvent::ButtonUp {
                button,
                x,
                y,
                clicks,
            } => {
                self.position = (x, y);
                let event = MouseEvent::at(x, y).with_button(button, clicks);
                listener.mouse_released(event);
                if self.pressed_at[button.index()].take() == Some((x, y)) {
                    listener.mouse_clicked(event);
                }
            }
            RawMouseEvent::Wheel { delta } => {
                let (x, y) = self.position;
                listener.mouse_wheel_moved(MouseEvent::at(x, y), delta);
            }
            RawMouseEvent::Entered => {
                let (x, y) = self.position;
                listener.mouse_entered(MouseEvent::at(x, y));
            }
            RawMouseEvent::Exited => {
                let (x, y) = self.position;
                listener.mouse_exited(MouseEvent::at(x, y));
            }
        }
    }
}
