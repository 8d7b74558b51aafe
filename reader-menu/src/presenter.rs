use crate::policy::MenuAction;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The view the menu was opened from.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub view: String,
    pub bounds: Rect,
}

impl Anchor {
    pub fn new(view: impl Into<String>, bounds: Rect) -> Self {
        Anchor {
            view: view.into(),
            bounds,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PresentationStyle {
    /// Pointing at the anchor's bounds, any arrow direction.
    Popover { anchor: Anchor },
    /// Modal, from the bottom of the screen.
    ActionSheet,
}

impl PresentationStyle {
    pub fn choose(presenter: &dyn MenuPresenter, anchor: &Anchor) -> Self {
        if presenter.supports_anchored_popovers() {
            PresentationStyle::Popover {
                anchor: anchor.clone(),
            }
        } else {
            PresentationStyle::ActionSheet
        }
    }
}

pub trait MenuPresenter: Send + Sync {
    fn supports_anchored_popovers(&self) -> bool;

    fn show(&self, actions: &[MenuAction], style: PresentationStyle);

    fn dismiss(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Presenter {
        popovers: bool,
    }

    impl MenuPresenter for Presenter {
        fn supports_anchored_popovers(&self) -> bool {
            self.popovers
        }

        fn show(&self, _actions: &[MenuAction], _style: PresentationStyle) {}

        fn dismiss(&self) {}
    }

    #[test]
    fn test_style_follows_capability() {
        let anchor = Anchor::new(
            "more-button",
            Rect {
                x: 10.0,
                y: 20.0,
                width: 44.0,
                height: 44.0,
            },
        );

        assert_eq!(
            PresentationStyle::choose(&Presenter { popovers: true }, &anchor),
            PresentationStyle::Popover {
                anchor: anchor.clone()
            }
        );
        assert_eq!(
            PresentationStyle::choose(&Presenter { popovers: false }, &anchor),
            PresentationStyle::ActionSheet
        );
    }
}
