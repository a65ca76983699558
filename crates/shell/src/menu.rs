use liminal_scene::SceneInfo;

/// Pixels scrolled per arrow-key press.
pub const KEY_SCROLL_STEP: f32 = 20.0;

/// Scroll position of the menu list, clamped to the scrollable range.
///
/// Extents are pushed in by the host each frame (the widget layer knows the
/// pixel sizes); everything else is derived.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollState {
    offset: f32,
    viewport: f32,
    content: f32,
}

/// Proportional scrollbar geometry, as fractions of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIndicator {
    /// Bar length as a fraction of the track.
    pub bar_fraction: f32,
    /// Bar top as a fraction of the track.
    pub position_fraction: f32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the viewport and content heights, re-clamping the offset so
    /// a shrinking list never leaves the view stranded past the end.
    pub fn set_extents(&mut self, viewport: f32, content: f32) {
        self.viewport = viewport.max(0.0);
        self.content = content.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn max_offset(&self) -> f32 {
        (self.content - self.viewport).max(0.0)
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scrollbar geometry, or `None` when the content already fits.
    pub fn indicator(&self) -> Option<ScrollIndicator> {
        let max = self.max_offset();
        if max <= 0.0 || self.content <= 0.0 {
            return None;
        }
        let bar_fraction = (self.viewport / self.content).clamp(0.0, 1.0);
        let position_fraction = self.offset / max * (1.0 - bar_fraction);
        Some(ScrollIndicator {
            bar_fraction,
            position_fraction,
        })
    }
}

/// The variant menu: catalog entries plus selection and scroll state.
#[derive(Debug, Default, Clone)]
pub struct MenuModel {
    entries: Vec<SceneInfo>,
    selected: Option<usize>,
    pub scroll: ScrollState,
}

impl MenuModel {
    pub fn new(entries: Vec<SceneInfo>) -> Self {
        Self {
            entries,
            selected: None,
            scroll: ScrollState::new(),
        }
    }

    pub fn entries(&self) -> &[SceneInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marks `index` selected and hands back its entry; out-of-range
    /// indices leave the previous selection in place.
    pub fn select(&mut self, index: usize) -> Option<&SceneInfo> {
        if index < self.entries.len() {
            self.selected = Some(index);
        }
        self.selected.and_then(|i| self.entries.get(i))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize) -> SceneInfo {
        SceneInfo {
            index,
            name: format!("Scene {index}"),
            description: String::from("test entry"),
        }
    }

    #[test]
    fn scroll_clamps_at_both_ends() {
        let mut scroll = ScrollState::new();
        scroll.set_extents(100.0, 400.0);
        scroll.scroll_by(-50.0);
        assert_eq!(scroll.offset(), 0.0);
        scroll.scroll_by(1_000.0);
        assert_eq!(scroll.offset(), 300.0);
    }

    #[test]
    fn shrinking_content_reclamps_the_offset() {
        let mut scroll = ScrollState::new();
        scroll.set_extents(100.0, 400.0);
        scroll.scroll_by(300.0);
        scroll.set_extents(100.0, 150.0);
        assert_eq!(scroll.offset(), 50.0);
    }

    #[test]
    fn indicator_is_proportional() {
        let mut scroll = ScrollState::new();
        scroll.set_extents(100.0, 400.0);
        scroll.scroll_by(300.0);
        let bar = scroll.indicator().unwrap();
        assert!((bar.bar_fraction - 0.25).abs() < 1e-6);
        assert!((bar.position_fraction - 0.75).abs() < 1e-6);
    }

    #[test]
    fn fitting_content_needs_no_indicator() {
        let mut scroll = ScrollState::new();
        scroll.set_extents(400.0, 100.0);
        assert!(scroll.indicator().is_none());
    }

    #[test]
    fn select_returns_the_entry() {
        let mut menu = MenuModel::new(vec![entry(0), entry(1), entry(2)]);
        let info = menu.select(1).cloned().unwrap();
        assert_eq!(info.index, 1);
        assert_eq!(menu.selected(), Some(1));
    }

    #[test]
    fn out_of_range_select_keeps_the_old_selection() {
        let mut menu = MenuModel::new(vec![entry(0), entry(1)]);
        menu.select(1);
        assert!(menu.select(7).is_some());
        assert_eq!(menu.selected(), Some(1));
    }
}
