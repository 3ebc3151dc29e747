pub(crate) const VERSION: &str = "1.0.2";

pub(crate) const ROUTE_LIST: &str = "/api/v1/blockchain/list";
pub(crate) const ROUTE_BLOCK: &str = "/api/v1/blockchain/{index}";
pub(crate) const ROUTE_APPEND: &str = "/api/v1/blockchain";
pub(crate) const ROUTE_GENESIS: &str = "/api/v1/genesis";
pub(crate) const ROUTE_IS_ALIVE: &str = "/api/v2/sys/info/isalive";

pub(crate) const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
