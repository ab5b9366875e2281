pub mod control_bar;
pub mod dialog;
pub mod params_panel;
pub mod word_card;
