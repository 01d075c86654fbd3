pub mod entities;
pub mod requests;
pub mod resolver;
pub mod responses;
