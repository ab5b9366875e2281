pub mod controller;
pub mod guard;
pub mod params;
pub mod review;
