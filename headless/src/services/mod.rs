pub mod claim_import;
pub mod frame_loop;
