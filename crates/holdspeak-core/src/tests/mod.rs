mod hotkey;
mod inject;
mod session;
