//! Terminal rendering of the host window.

use std::io::{Write, stdout};

use hotframe_guest::Visual;
use owo_colors::OwoColorize;

use super::{ContentHost, ContentView};

const PLACEHOLDER: &str = "(no app loaded)";

/// Plain-text lines of the window, top to bottom.
pub fn render_lines(host: &ContentHost) -> Vec<String> {
    let chrome = host.chrome();
    let mut lines = vec![
        chrome.window_title(),
        format!("Loads: {}{}", chrome.load_count(), chrome.status()),
        String::new(),
    ];

    match host.view() {
        ContentView::Placeholder => lines.push(PLACEHOLDER.to_string()),
        ContentView::Message(text) => lines.push(text.clone()),
        ContentView::Mounted(handle) => render_visual(handle.content(), 0, &mut lines),
    }
    lines
}

fn render_visual(visual: &Visual, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match visual {
        Visual::Empty => {}
        Visual::Text { text } => {
            out.extend(text.lines().map(|line| format!("{indent}{line}")));
        }
        Visual::Stack {
            horizontal: true,
            children,
        } if children.iter().all(|c| matches!(c, Visual::Text { .. })) => {
            let joined = children
                .iter()
                .filter_map(|c| match c {
                    Visual::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" | ");
            out.push(format!("{indent}{joined}"));
        }
        Visual::Stack { children, .. } => {
            for child in children {
                render_visual(child, depth, out);
            }
        }
        Visual::Panel { title, child } => {
            out.push(format!("{indent}┌ {}", title.as_deref().unwrap_or("")));
            render_visual(child, depth + 1, out);
            out.push(format!("{indent}└"));
        }
    }
}

/// Print the window below the log output.
pub fn present(host: &ContentHost) {
    let lines = render_lines(host);
    let mut stdout = stdout().lock();
    for (i, line) in lines.iter().enumerate() {
        let styled = match i {
            0 => line.bold().to_string(),
            1 => line.dimmed().to_string(),
            _ => line.clone(),
        };
        writeln!(stdout, "  {styled}").ok();
    }
    stdout.flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Generation, GuestRoot};
    use crate::view::GuestRootHandle;

    #[test]
    fn test_placeholder_window() {
        let host = ContentHost::new();
        let lines = render_lines(&host);
        assert_eq!(lines[0], "Hotframe Host");
        assert_eq!(lines[1], "Loads: 0 - Starting...");
        assert_eq!(lines.last().unwrap(), PLACEHOLDER);
    }

    #[test]
    fn test_mounted_window() {
        let mut host = ContentHost::new();
        let content = Visual::panel(
            "hello",
            Visual::column(vec![
                Visual::text("first"),
                Visual::row(vec![Visual::text("a"), Visual::text("b")]),
            ]),
        );
        host.mount(GuestRootHandle::new(
            Generation::new(1),
            GuestRoot {
                title: "Demo".into(),
                content,
            },
        ));

        let lines = render_lines(&host);
        assert_eq!(lines[0], "Hotframe Host - Demo");
        assert!(lines[1].starts_with("Loads: 1 - Loaded ("));
        assert_eq!(&lines[3..], ["┌ hello", "  first", "  a | b", "└"]);
    }

    #[test]
    fn test_message_window() {
        let mut host = ContentHost::new();
        host.show_message("Load failed: boom");
        assert_eq!(render_lines(&host).last().unwrap(), "Load failed: boom");
    }
}
