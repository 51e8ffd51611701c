pub mod category;
pub mod home;
