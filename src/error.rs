use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum ExchangeError {
    #[display("request to {exchange} failed")]
    Request { exchange: String },
    #[display("failed to parse response from {exchange}")]
    ResponseParse { exchange: String },
    #[display("rate limit exceeded for {exchange}")]
    #[allow(dead_code)]
    RateLimit { exchange: String },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("insufficient data: need {required}, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[display("malformed candle sequence: {reason}")]
    MalformedCandle { reason: String },
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}

#[derive(Debug, Display, Error)]
pub enum NotifierError {
    #[display("telegram credentials are empty")]
    MissingCredentials,
    #[display("failed to deliver message")]
    Request,
    #[display("message rejected with HTTP status {status}")]
    Rejected { status: u16 },
}

/// Per-cycle failure context attached at the scheduler boundary.
#[derive(Debug, Display, Error)]
pub enum CycleError {
    #[display("candle fetch failed")]
    Fetch,
    #[display("indicator computation failed")]
    Compute,
    #[display("message publish failed")]
    Publish,
}
