pub mod entities;
pub mod fine;
pub mod requests;
pub mod responses;
