pub mod business;
pub mod review;
pub mod user;
