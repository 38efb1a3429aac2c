pub mod articles;
pub mod chat;
pub mod models;
pub mod review;
pub mod site;
pub mod status;
