mod config;
mod keymap;
