//! Session orchestration: launch, focus, navigate, type the code

mod controller;

pub use controller::SessionController;
