//! Repositories: one struct of associated functions per table.

mod city_repo;
mod user_repo;

pub use city_repo::CityRepo;
pub use user_repo::UserRepo;
