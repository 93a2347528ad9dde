pub mod pline_offset;
