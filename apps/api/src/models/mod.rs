pub mod catalog;
pub mod pairing;
pub mod pairing_log;
