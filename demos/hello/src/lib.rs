//! Minimal hotframe guest. Edit the content, rebuild, watch the host swap it.

use hotframe_guest::{GuestWindow, Visual, export_guest};

pub struct MainWindow {
    content: Option<Visual>,
}

impl GuestWindow for MainWindow {
    fn new() -> Result<Self, String> {
        println!("[demo] MainWindow loaded - v1");
        let content = Visual::panel(
            "hello",
            Visual::column(vec![
                Visual::text("Hello from a hot-reloaded guest."),
                Visual::row(vec![Visual::text("edit"), Visual::text("rebuild"), Visual::text("repeat")]),
            ]),
        );
        Ok(Self {
            content: Some(content),
        })
    }

    fn title(&self) -> &str {
        "Demo"
    }

    fn take_content(&mut self) -> Option<Visual> {
        self.content.take()
    }
}

export_guest!(MainWindow);
