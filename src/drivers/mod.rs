//! Hardware drivers written against `embedded-hal` 1.0 traits.

pub mod doorbell;
pub mod indicator;
pub mod lcd;
pub mod pump;
pub mod servo;
