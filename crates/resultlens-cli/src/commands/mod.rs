pub mod analyze;
pub mod correlate;
pub mod init;
pub mod insights;
pub mod quality;
pub mod report;
