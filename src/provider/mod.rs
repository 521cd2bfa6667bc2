pub use self::{http::HTTP, price::PriceOracle};

mod http;
mod price;
pub mod rpc;
pub mod scan;
