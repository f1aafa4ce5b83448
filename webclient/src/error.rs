use reqwest::StatusCode;
use scraper::Selector;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to parse as URL '{url}'")]
    InvalidSyntaxUrl {
        url: String,

        #[source]
        source: url::ParseError,
    },

    #[error("Unexpected response code '{got}' (expected '{expected}') while requesting to {requested_url}")]
    UnexpectedResponseCode {
        got: StatusCode,
        expected: StatusCode,
        requested_url: String,
    },

    #[error("No such html element (selector: {0:?})")]
    NoSuchElementMatchesToSelector(Selector),

    #[error("Sample inputs and outputs do not pair up ({inputs} inputs, {outputs} outputs) in {requested_url}")]
    UnpairedSamples {
        inputs: usize,
        outputs: usize,
        requested_url: String,
    },

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
}
