pub mod compare;
pub mod init;
pub mod purposes;
pub mod simulate;
pub mod validate;
