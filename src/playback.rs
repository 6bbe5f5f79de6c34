pub mod controller;
pub mod mapper;
pub mod progress;
pub mod session;
