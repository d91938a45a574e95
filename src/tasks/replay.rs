use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::events::{ScreenEvent, ScriptStep};
use crate::geometry::Size;
use crate::screen::ArtDetailScreen;
use crate::viewport_store::ViewportChange;

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ScriptStep>> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_yaml::from_str(&s).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Paces the script: waits each step's `after`, then hands its event to `run`.
pub async fn feed(
    steps: Vec<ScriptStep>,
    to_screen: Sender<ScreenEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    for ScriptStep { after, event } in steps {
        select! {
            _ = cancel.cancelled() => break,
            _ = sleep(after) => {}
        }
        if to_screen.send(event).await.is_err() {
            warn!("screen channel closed");
            break;
        }
    }
    Ok(())
}

/// Delivers events to `screen` until the feed ends or `cancel` fires.
///
/// While running, a second observer stands in for another screen sharing the
/// viewport store and logs the user gestures it would mirror.
pub async fn run(
    screen: Rc<ArtDetailScreen>,
    mut events: Receiver<ScreenEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    let viewports = screen.context().viewports.clone();
    let mirror = viewports.add_observer(|change: &ViewportChange| {
        if change.from_user {
            info!(id = %change.id, viewport = %change.viewport, "mirroring user viewport");
        }
    });

    loop {
        select! {
            _ = cancel.cancelled() => break,
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => apply(&screen, event),
                    None => break,
                }
            }
        }
    }

    viewports.remove_observer(mirror);
    Ok(())
}

pub fn apply(screen: &Rc<ArtDetailScreen>, event: ScreenEvent) {
    debug!(?event, "event");
    let context = screen.context();
    match event {
        ScreenEvent::WallpaperSize { width, height } => {
            screen.on_wallpaper_size(Size::new(width, height))
        }
        ScreenEvent::ArtworkSize { width, height } => {
            screen.on_artwork_size(Size::new(width, height))
        }
        ScreenEvent::SwitchStarted { viewport_id } => {
            context.switching.begin(viewport_id);
        }
        ScreenEvent::SwitchDone { viewport_id } => {
            context.switching.finish(viewport_id);
        }
        ScreenEvent::SwitchIdle => {
            context.switching.reset();
        }
        ScreenEvent::NextArtwork => screen.on_next_artwork(),
        ScreenEvent::ArtworkLoaded { path } => screen.on_artwork_loaded(path),
        ScreenEvent::Pan { viewport } => screen.on_viewport_changed(viewport),
        ScreenEvent::RemoteViewport {
            viewport_id,
            viewport,
            from_user,
        } => {
            let current = screen.current_viewport_id();
            let id = viewport_id.unwrap_or(current);
            if id != current {
                trace!(%id, %current, "remote viewport for a non-current epoch");
            }
            context.viewports.set_viewport(id, viewport, from_user);
        }
        ScreenEvent::Start => screen.on_start(),
        ScreenEvent::Stop => screen.on_stop(),
    }
}
