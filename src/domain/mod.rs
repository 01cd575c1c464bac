// Core models and the traits the pipelines are written against.

pub mod model;
pub mod ports;
