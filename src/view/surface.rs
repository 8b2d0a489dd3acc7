use crate::geometry::{Rect, Size};

/// Host area views are instantiated into. Views fill it entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
    size: Size,
}

impl Container {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }
}

/// Optional group controlling opacity and input for a whole view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeGroup {
    pub alpha: f32,
    pub interactable: bool,
    pub blocks_input: bool,
}

impl FadeGroup {
    const SHOWN: Self = Self {
        alpha: 1.0,
        interactable: true,
        blocks_input: true,
    };
    const HIDDEN: Self = Self {
        alpha: 0.0,
        interactable: false,
        blocks_input: false,
    };
}

/// Display state of one view: the visibility flag plus the renderable
/// resource it mirrors.
///
/// `show`/`hide` always rewrite every field, so repeated calls cannot drift.
/// Without a fade group, hiding deactivates the resource instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    visible: bool,
    active: bool,
    fade: Option<FadeGroup>,
    frame: Option<Rect>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Surface that deactivates its resource when hidden.
    pub fn new() -> Self {
        Self {
            visible: false,
            active: true,
            fade: None,
            frame: None,
        }
    }

    /// Surface backed by a fade group; hiding keeps the resource active.
    pub fn with_fade() -> Self {
        Self {
            fade: Some(FadeGroup::SHOWN),
            ..Self::new()
        }
    }

    /// Returns true when the surface was not already visible.
    pub fn show(&mut self) -> bool {
        let changed = !self.visible;
        self.active = true;
        if let Some(fade) = self.fade.as_mut() {
            *fade = FadeGroup::SHOWN;
        }
        self.visible = true;
        changed
    }

    /// Returns true when the surface was visible before the call.
    pub fn hide(&mut self) -> bool {
        let changed = self.visible;
        match self.fade.as_mut() {
            Some(fade) => *fade = FadeGroup::HIDDEN,
            None => self.active = false,
        }
        self.visible = false;
        changed
    }

    /// Hide, then deactivate the resource even when a fade group is present.
    /// Returns true when the surface was visible before the call.
    pub fn close(&mut self) -> bool {
        let changed = self.hide();
        self.active = false;
        changed
    }

    pub fn fill(&mut self, bounds: Rect) {
        self.frame = Some(bounds);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_interactable(&self) -> bool {
        match self.fade {
            Some(fade) => self.active && fade.interactable,
            None => self.active,
        }
    }

    pub fn fade(&self) -> Option<FadeGroup> {
        self.fade
    }

    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }
}
