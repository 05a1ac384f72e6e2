pub mod completions;
pub mod init;
pub mod log;
pub mod movement;
pub mod register;
pub mod report;
pub mod stalls;
