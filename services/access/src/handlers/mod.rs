pub mod verify;
pub mod webhook;
