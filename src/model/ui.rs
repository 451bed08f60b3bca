//! UI state - focus and panel identity, separate from dashboard data

/// Dashboard panels in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Datasets,
    Upload,
    Preview,
    Ask,
    History,
}

impl Panel {
    pub fn all() -> [Panel; 5] {
        [
            Panel::Datasets,
            Panel::Upload,
            Panel::Preview,
            Panel::Ask,
            Panel::History,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Panel::Datasets => "Datasets",
            Panel::Upload => "Upload",
            Panel::Preview => "Top Rows",
            Panel::Ask => "Ask a Question",
            Panel::History => "Prompt History",
        }
    }

    /// Panels whose keys go into a text input
    pub fn takes_text(&self) -> bool {
        matches!(self, Panel::Upload | Panel::Preview | Panel::Ask)
    }

    pub fn next(&self) -> Panel {
        let all = Panel::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Panel {
        let all = Panel::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}
