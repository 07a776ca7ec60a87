pub mod db;
pub mod payments;
