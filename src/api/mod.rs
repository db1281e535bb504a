pub mod attendance;
pub mod dashboard;
pub mod department;
pub mod employee;
pub mod setting;
