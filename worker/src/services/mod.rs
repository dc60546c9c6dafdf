pub mod callback_worker;
pub mod expiry_sweep;
