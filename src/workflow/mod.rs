pub mod commit;
pub mod review;
