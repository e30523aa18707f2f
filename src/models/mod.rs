pub mod args;
pub mod outcome;
pub mod report;
