pub mod loads;
