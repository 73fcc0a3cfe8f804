pub mod setup;
pub mod ui;
pub mod view;
pub mod widget;
