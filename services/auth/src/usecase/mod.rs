pub mod admin;
pub mod login;
pub mod register;
pub mod two_factor;
