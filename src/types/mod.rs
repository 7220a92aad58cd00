pub mod db;
pub mod internal;
