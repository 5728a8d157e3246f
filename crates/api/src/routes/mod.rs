pub mod health;
pub mod snowflake;
