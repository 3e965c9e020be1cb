pub mod actions;
pub mod apply;
pub mod diagnostics;
pub mod init;
pub mod recover;
