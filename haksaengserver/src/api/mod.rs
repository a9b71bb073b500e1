pub mod haksaeng_api;


pub use haksaeng_api::configure_haksaeng_routes;
