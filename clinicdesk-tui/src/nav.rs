//! Pane focus cycling.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Sidebar,
    Queue,
}

impl Pane {
    pub fn title(&self) -> &'static str {
        match self {
            Pane::Sidebar => "Navigation",
            Pane::Queue => "Conversations",
        }
    }

    pub fn all() -> &'static [Pane] {
        &[Pane::Sidebar, Pane::Queue]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Pane {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> Pane {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
