pub mod chat;
pub mod dialog;
pub mod launcher;
pub mod theme;
