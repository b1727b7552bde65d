pub mod conf;
pub mod logging;
pub mod message;
pub mod pipeline;
pub mod runtime;
pub mod sink;
pub mod store;
