//! Resource implementations behind the generic CRUD surface.

pub mod city;
pub mod users;
