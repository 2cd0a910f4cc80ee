pub mod preview;
pub mod session;
