//! Configuration domain module

mod reporter_config;
mod transport_config;

pub use reporter_config::{
    BusConfig, HttpConfig, ReporterConfig, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT,
};
pub use transport_config::{
    ComputedParam, ParamValue, TransportConfig, TransportOverrides, RESERVED_KEYS,
};
