use sounder_interactive::{MouseEvent, MouseListener, Window};
use std::borrow::Cow;

/// Prints every mouse event and shows the most recent ones in the window.
#[derive(Default)]
struct Printer {
    lines: Vec<String>,
}

impl Printer {
    fn add(&mut self, name: &str, event: MouseEvent) {
        let line = format!("{} {:?}", name, event);
        println!("{}", line);
        self.lines.push(line);
    }
}

impl MouseListener for Printer {
    fn mouse_moved(&mut self, event: MouseEvent) {
        self.add("moved", event);
    }

    fn mouse_dragged(&mut self, event: MouseEvent) {
        self.add("dragged", event);
    }

    fn mouse_clicked(&mut self, event: MouseEvent) {
        self.add("clicked", event);
    }

    fn mouse_wheel_moved(&mut self, event: MouseEvent, delta: i32) {
        self.add(&format!("wheel {}", delta), event);
    }

    fn info_lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.lines.iter().map(|line| Cow::Borrowed(line.as_str()))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let window = Window::builder().title("mouse events").build();
    window.run(&mut Printer::default())
}
