pub mod form;
pub mod slot_grid;
