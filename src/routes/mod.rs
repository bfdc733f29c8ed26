pub mod episodes;
pub mod health;
