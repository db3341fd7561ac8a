//! Control-bar customization
//!
//! The runtime's own rewind/forward icons are removed and replaced with two
//! custom buttons that seek 10 seconds back or ahead. The buttons sit right
//! after the play/pause control: play → rewind → forward → the rest.
//!
//! Customization runs on every `ready` event, so it must be idempotent:
//! a custom button is only inserted when the bar does not already hold one.

use crate::{runtime::PlayerHandle, Result};
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

/// Class of the runtime's button container
pub const BUTTON_CONTAINER_CLASS: &str = "jw-button-container";
/// Class of the runtime's play/pause control
pub const PLAYBACK_ICON_CLASS: &str = "jw-icon-playback";
/// Default icons removed from the bar
pub const DEFAULT_SEEK_ICON_CLASSES: [&str; 2] = ["jw-icon-rewind", "jw-icon-forward"];

pub const CUSTOM_REWIND_CLASS: &str = "custom-rewind-btn";
pub const CUSTOM_FORWARD_CLASS: &str = "custom-forward-btn";

/// Classes shared with the runtime's own inline icons
const BASE_BUTTON_CLASSES: &str = "jw-icon jw-icon-inline jw-button-color jw-reset";

/// Seconds moved by one click
pub const SEEK_STEP_SECS: f64 = 10.0;

/// Click callback attached to a custom button
pub type ClickHandler = Box<dyn Fn()>;

/// A button to be created in the control bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    /// Full class attribute
    pub class_name: String,
    /// Class that identifies this button
    pub marker_class: &'static str,
    pub label: &'static str,
}

/// Where an inserted button ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    AfterAnchor,
    /// Anchor missing; button appended at the end of the bar
    Appended,
}

/// The runtime's rendered button container
pub trait ControlBar {
    /// Number of elements carrying `class`
    fn count(&self, class: &str) -> usize;

    /// Remove every element carrying `class`, returning how many went away
    fn remove_all(&mut self, class: &str) -> usize;

    /// Insert a new button right after the first element carrying
    /// `anchor_class`, or at the end when there is none
    fn insert_after(
        &mut self,
        anchor_class: &str,
        button: &ButtonSpec,
        on_click: ClickHandler,
    ) -> Result<Placement>;
}

/// Direction of a custom seek button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Rewind,
    Forward,
}

impl SeekDirection {
    /// Seek target for a click at `position`. Rewind clamps at the start of
    /// the media; forward is left for the runtime to clamp at the end.
    pub fn target(&self, position: f64) -> f64 {
        let position = if position.is_finite() { position } else { 0.0 };
        match self {
            SeekDirection::Rewind => (position - SEEK_STEP_SECS).max(0.0),
            SeekDirection::Forward => position + SEEK_STEP_SECS,
        }
    }

    pub fn marker_class(&self) -> &'static str {
        match self {
            SeekDirection::Rewind => CUSTOM_REWIND_CLASS,
            SeekDirection::Forward => CUSTOM_FORWARD_CLASS,
        }
    }

    pub fn button(&self) -> ButtonSpec {
        let label = match self {
            SeekDirection::Rewind => "⏪10",
            SeekDirection::Forward => "10⏩",
        };
        ButtonSpec {
            class_name: format!("{} {}", BASE_BUTTON_CLASSES, self.marker_class()),
            marker_class: self.marker_class(),
            label,
        }
    }
}

impl std::fmt::Display for SeekDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeekDirection::Rewind => write!(f, "rewind"),
            SeekDirection::Forward => write!(f, "forward"),
        }
    }
}

/// Outcome of one customization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomizeReport {
    /// Default icons removed
    pub removed: usize,
    /// Custom buttons created in this pass
    pub inserted: Vec<SeekDirection>,
    /// Buttons that had to be appended because the play control was missing
    pub appended: usize,
}

/// Click handler that seeks the player relative to its current position
pub fn seek_handler<H: PlayerHandle + 'static>(player: Weak<H>, direction: SeekDirection) -> ClickHandler {
    Box::new(move || {
        let Some(player) = player.upgrade() else {
            debug!(%direction, "Seek click ignored, player released");
            return;
        };
        let position = player.position();
        let target = direction.target(position);
        debug!(%direction, position, target, "Seek click");
        player.seek(target);
    })
}

/// Swap the default seek icons for the custom buttons
///
/// Returns `None` when the runtime has not rendered a control bar.
pub fn customize_control_bar<H: PlayerHandle + 'static>(player: &Rc<H>) -> Option<CustomizeReport> {
    let Some(mut bar) = player.control_bar() else {
        warn!(container = BUTTON_CONTAINER_CLASS, "Control bar not rendered, skipping customization");
        return None;
    };

    let mut report = CustomizeReport {
        removed: DEFAULT_SEEK_ICON_CLASSES
            .iter()
            .map(|class| bar.remove_all(class))
            .sum(),
        ..Default::default()
    };

    // A lone custom button cannot keep the pair in order; rebuild both
    let has_rewind = bar.count(CUSTOM_REWIND_CLASS) > 0;
    let has_forward = bar.count(CUSTOM_FORWARD_CLASS) > 0;
    if has_rewind != has_forward {
        let stale: usize = [CUSTOM_REWIND_CLASS, CUSTOM_FORWARD_CLASS]
            .iter()
            .map(|class| bar.remove_all(class))
            .sum();
        debug!(stale, "Partial custom buttons removed");
    }

    // Rewind anchors on play/pause, forward anchors on rewind
    let anchors = [
        (SeekDirection::Rewind, PLAYBACK_ICON_CLASS),
        (SeekDirection::Forward, CUSTOM_REWIND_CLASS),
    ];
    for (direction, anchor) in anchors {
        if bar.count(direction.marker_class()) > 0 {
            continue;
        }
        let placement = bar.insert_after(
            anchor,
            &direction.button(),
            seek_handler(Rc::downgrade(player), direction),
        );
        match placement {
            Ok(Placement::AfterAnchor) => {}
            Ok(Placement::Appended) => {
                warn!(%direction, anchor, "Anchor control missing, button appended");
                report.appended += 1;
            }
            Err(err) => {
                warn!(%direction, error = %err, "Failed to insert button");
                continue;
            }
        }
        report.inserted.push(direction);
    }

    info!(
        removed = report.removed,
        inserted = report.inserted.len(),
        "Control bar customized"
    );
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_clamps_at_start() {
        assert_eq!(SeekDirection::Rewind.target(5.0), 0.0);
        assert_eq!(SeekDirection::Rewind.target(15.0), 5.0);
        assert_eq!(SeekDirection::Rewind.target(10.0), 0.0);
    }

    #[test]
    fn test_forward_has_no_upper_clamp() {
        assert_eq!(SeekDirection::Forward.target(5.0), 15.0);
        assert_eq!(SeekDirection::Forward.target(7200.0), 7210.0);
    }

    #[test]
    fn test_non_finite_position_treated_as_start() {
        assert_eq!(SeekDirection::Rewind.target(f64::NAN), 0.0);
        assert_eq!(SeekDirection::Forward.target(f64::NAN), 10.0);
    }

    #[test]
    fn test_button_specs() {
        let rewind = SeekDirection::Rewind.button();
        assert_eq!(
            rewind.class_name,
            "jw-icon jw-icon-inline jw-button-color jw-reset custom-rewind-btn"
        );
        assert_eq!(rewind.label, "⏪10");
        assert_eq!(SeekDirection::Forward.button().marker_class, "custom-forward-btn");
    }
}
