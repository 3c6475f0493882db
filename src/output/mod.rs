pub mod response;

pub use response::respond;
