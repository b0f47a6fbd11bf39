mod country;
mod user;

pub use country::Country;
pub use user::{NewUser, User};
