pub mod frame_view;
pub mod input;
pub mod mode;
pub mod view;
