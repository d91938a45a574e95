pub mod config;
pub mod events;
pub mod geometry;
pub mod loading;
pub mod observable;
pub mod orientation;
pub mod reconciler;
pub mod scope;
pub mod screen;
pub mod switching;
pub mod testkit;
pub mod view;
pub mod viewport_store;
pub mod tasks {
    pub mod replay;
}
