use std::error::Error as _;
use std::io;

use tracing::debug;
use ureq::Error::{Status, Transport};
use ureq::{Agent, AgentBuilder, ErrorKind};

use crate::config::FetchConfig;

use super::{FileDownloader, Response};

pub struct UReqFetcher {
    agent: Agent,
}

impl FileDownloader for UReqFetcher {
    fn fetch(&self, url: &str) -> Response {
        debug!(url, "sending GET");

        let response = self.agent.get(url).call();

        match response {
            Ok(response) => {
                let code = response.status();

                debug!(url, code, "received response");

                if !(200..300).contains(&code) {
                    return Response::status(code, response.status_text());
                }

                let content_type = response.header("Content-Type").map(str::to_string);

                Response::stream(response.into_reader(), content_type)
            }

            Err(Status(code, response)) => Response::status(code, response.status_text()),

            Err(Transport(transport)) => transport_response(&transport),
        }
    }
}

impl UReqFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        UReqFetcher { agent }
    }
}

impl Default for UReqFetcher {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

fn transport_response(transport: &ureq::Transport) -> Response {
    let detail = transport.to_string();

    debug!(kind = ?transport.kind(), %detail, "transport failure");

    if is_timeout(transport) {
        return Response::timeout();
    }

    match transport.kind() {
        ErrorKind::Dns | ErrorKind::ConnectionFailed | ErrorKind::ProxyConnect | ErrorKind::Io => {
            Response::connection_failed(detail)
        }
        _ => Response::request_failed(detail),
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let io_timeout = transport
        .source()
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|err| {
            matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            )
        });

    io_timeout || transport.to_string().contains("timed out")
}
