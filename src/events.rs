use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::geometry::{Viewport, ViewportId};

/// Something that happens to the art detail screen or its shared state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScreenEvent {
    /// Wallpaper target area changed (rotation, window resize).
    WallpaperSize { width: f32, height: f32 },
    /// Intrinsic size of the artwork changed.
    ArtworkSize { width: f32, height: f32 },
    #[serde(rename_all = "kebab-case")]
    SwitchStarted { viewport_id: ViewportId },
    #[serde(rename_all = "kebab-case")]
    SwitchDone { viewport_id: ViewportId },
    SwitchIdle,
    /// User pressed "next artwork".
    NextArtwork,
    /// New artwork finished loading.
    ArtworkLoaded {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// Pan/zoom gesture on this screen.
    Pan { viewport: Viewport },
    /// Viewport written by another screen (e.g. the wallpaper renderer).
    #[serde(rename_all = "kebab-case")]
    RemoteViewport {
        #[serde(default)]
        viewport_id: Option<ViewportId>,
        viewport: Viewport,
        #[serde(default)]
        from_user: bool,
    },
    Start,
    Stop,
}

/// One entry of a replay script: wait `after`, then deliver `event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScriptStep {
    #[serde(default, with = "humantime_serde")]
    pub after: Duration,
    #[serde(flatten)]
    pub event: ScreenEvent,
}
