mod controls;
mod fps;
mod view_mode;

pub(super) use fps::FrameRate;
