pub mod igtag_core;
