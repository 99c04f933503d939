//! The lightbox state machine.
//!
//! The state is the index of the displayed photo within the filtered photo
//! list and the zoom level. It is carried between requests in the query
//! string, so every transition is a pure function of the current state, the
//! action and the length of the list.

use serde::{Deserialize, Serialize};

/// How far the displayed photo is scaled, always within [Zoom::MIN, Zoom::MAX].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 3.0;
    pub const STEP: f64 = 0.1;

    /// Create a zoom level, rounded to one decimal place and clamped to the
    /// allowed range. Non-finite values give the default zoom.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }

        let rounded = (value * 10.0).round() / 10.0;

        Self(rounded.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    #[must_use]
    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    /// Whether the zoom can be increased any further.
    pub fn can_zoom_in(&self) -> bool {
        self.0 < Self::MAX
    }

    /// Whether the zoom can be decreased any further.
    pub fn can_zoom_out(&self) -> bool {
        self.0 > Self::MIN
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// A user action in the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LightboxAction {
    Next,
    Previous,
    ZoomIn,
    ZoomOut,
    Close,
}

impl LightboxAction {
    /// The value used for the `action` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LightboxAction::Next => "next",
            LightboxAction::Previous => "previous",
            LightboxAction::ZoomIn => "zoom-in",
            LightboxAction::ZoomOut => "zoom-out",
            LightboxAction::Close => "close",
        }
    }
}

/// Whether the lightbox is showing a photo, and which one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open { index: usize, zoom: Zoom },
}

impl LightboxState {
    /// The lightbox opened at `index` with the default zoom.
    pub fn open(index: usize) -> Self {
        LightboxState::Open {
            index,
            zoom: Zoom::default(),
        }
    }

    /// The state after `action` is applied to a list of `len` photos.
    ///
    /// Navigation wraps around the ends of the list and resets the zoom.
    /// An index outside the list, or an empty list, closes the lightbox.
    #[must_use]
    pub fn apply(self, action: LightboxAction, len: usize) -> Self {
        let LightboxState::Open { index, zoom } = self else {
            return LightboxState::Closed;
        };

        if len == 0 || index >= len {
            return LightboxState::Closed;
        }

        match action {
            LightboxAction::Next => LightboxState::open((index + 1) % len),
            LightboxAction::Previous => LightboxState::open((index + len - 1) % len),
            LightboxAction::ZoomIn => LightboxState::Open {
                index,
                zoom: zoom.zoom_in(),
            },
            LightboxAction::ZoomOut => LightboxState::Open {
                index,
                zoom: zoom.zoom_out(),
            },
            LightboxAction::Close => LightboxState::Closed,
        }
    }

    /// The state after the displayed photo was deleted, leaving
    /// `remaining_len` photos in the list.
    ///
    /// The photo that moved into the deleted photo's position is shown,
    /// wrapping to the first photo when the last one was deleted. The
    /// lightbox closes when no photos remain.
    #[must_use]
    pub fn after_delete(self, remaining_len: usize) -> Self {
        match self {
            LightboxState::Closed => LightboxState::Closed,
            LightboxState::Open { .. } if remaining_len == 0 => LightboxState::Closed,
            LightboxState::Open { index, .. } if index < remaining_len => {
                LightboxState::open(index)
            }
            LightboxState::Open { .. } => LightboxState::open(0),
        }
    }
}
