use serde::{Deserialize, Serialize};

/// A guest's visual tree.
///
/// The host treats it as opaque content: it is only rendered, never
/// inspected for behavior. It crosses the boundary as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Visual {
    #[default]
    Empty,
    Text {
        text: String,
    },
    Stack {
        #[serde(default)]
        horizontal: bool,
        #[serde(default)]
        children: Vec<Visual>,
    },
    Panel {
        #[serde(default)]
        title: Option<String>,
        child: Box<Visual>,
    },
}

impl Visual {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn column(children: Vec<Visual>) -> Self {
        Self::Stack {
            horizontal: false,
            children,
        }
    }

    pub fn row(children: Vec<Visual>) -> Self {
        Self::Stack {
            horizontal: true,
            children,
        }
    }

    pub fn panel(title: impl Into<String>, child: Visual) -> Self {
        Self::Panel {
            title: Some(title.into()),
            child: Box::new(child),
        }
    }

    /// Number of nodes in the tree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Empty | Self::Text { .. } => 1,
            Self::Stack { children, .. } => 1 + children.iter().map(Self::node_count).sum::<usize>(),
            Self::Panel { child, .. } => 1 + child.node_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
