pub mod camera_frame;
pub mod config;
pub mod easing;
pub mod scene;
pub mod section;
pub mod stage;
pub mod tier;
pub mod time;
pub mod timeline;
pub mod tween;
