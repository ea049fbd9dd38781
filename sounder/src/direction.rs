use sounder_interactive::MouseEvent;
use std::fmt;

/// Direction the mouse moved between two events. Exactly one direction is reported even when
/// the mouse moved along both axes. The discriminants are stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

/// The axis with the larger change wins. Ties, including no movement at all, count as vertical.
/// Window y coordinates grow downwards so a decrease in y is `Up`.
pub fn determine_direction(current: &MouseEvent, prior: &MouseEvent) -> Direction {
    let delta_x = prior.x - current.x;
    let delta_y = prior.y - current.y;
    if delta_x.abs() > delta_y.abs() {
        if delta_x >= 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if delta_y >= 0 {
        Direction::Up
    } else {
        Direction::Down
    }
}
