pub mod yield_by;
