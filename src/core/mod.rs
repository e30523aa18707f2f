pub mod aggregate;
pub mod execute;
pub mod request_executor;
pub mod show_report;
pub mod ticket_counter;
