//! Engine dispatch interface and the text-protocol transport.
//!
//! The simulation engine is an opaque stateful external service: the
//! loaded circuit, defined load-shapes, monitor set, and run mode all
//! live on its side of the connection. Everything the pipeline does to it
//! goes through [`Engine`], which makes the session handle (and therefore
//! the ordering dependency between pipeline steps) explicit in type
//! signatures instead of implicit in call order.

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;

/// Error from the engine dispatch interface: a rejected directive or a
/// failed connection.
#[derive(Debug)]
pub struct EngineError {
    /// Directive that was being issued.
    pub directive: String,
    /// Engine or transport failure description.
    pub message: String,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directive \"{}\" failed: {}", self.directive, self.message)
    }
}

impl Error for EngineError {}

/// Handle to one engine session.
///
/// Directives are single-line text; each query returns a single textual
/// result. The two collection reads the pipeline needs are exposed as
/// structured accessors so callers never parse raw engine text themselves.
pub trait Engine {
    /// Issues a directive, discarding any textual result.
    fn command(&mut self, directive: &str) -> Result<(), EngineError>;

    /// Issues a query directive and returns its textual result.
    fn query(&mut self, directive: &str) -> Result<String, EngineError>;

    /// Names of all loads in the active circuit, in engine enumeration
    /// order. The order is not sorted and callers must preserve it.
    fn load_names(&mut self) -> Result<Vec<String>, EngineError>;

    /// Recorded values of one channel of a named monitor, one per
    /// simulated timestep.
    fn monitor_channel(&mut self, monitor_name: &str, channel: usize)
    -> Result<Vec<f64>, EngineError>;
}

/// Queries the first-terminal bus specifier of a load.
///
/// The structured load collection does not expose `bus1`, so this is the
/// one place the pipeline falls back to the raw text interface. Keeping
/// the round trip behind a typed function keeps the string protocol out
/// of the rest of the code.
pub fn query_bus_spec<E: Engine + ?Sized>(
    engine: &mut E,
    load_name: &str,
) -> Result<String, EngineError> {
    engine.query(&format!("? load.{load_name}.bus1"))
}

/// Line-protocol client for an engine listening on a TCP endpoint.
///
/// Every request line gets exactly one response line: empty for an
/// accepted command, the textual result for a query, or a line starting
/// with `error: ` when the engine rejects the directive. The collection
/// accessors map onto reserved queries whose results use the engine's
/// bracketed array form, e.g. `[a, b, c]`.
pub struct TextSocketEngine {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TextSocketEngine {
    /// Connects to the engine's text interface.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the endpoint is unreachable.
    pub fn connect(endpoint: &str) -> io::Result<Self> {
        let writer = TcpStream::connect(endpoint)?;
        let reader = BufReader::new(writer.try_clone()?);
        Ok(Self { reader, writer })
    }

    fn round_trip(&mut self, directive: &str) -> Result<String, EngineError> {
        let transport = |e: io::Error| EngineError {
            directive: directive.to_string(),
            message: e.to_string(),
        };

        writeln!(self.writer, "{directive}").map_err(transport)?;

        let mut line = String::new();
        let n = self.reader.read_line(&mut line).map_err(transport)?;
        if n == 0 {
            return Err(EngineError {
                directive: directive.to_string(),
                message: "connection closed by engine".to_string(),
            });
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(message) = line.strip_prefix("error: ") {
            return Err(EngineError {
                directive: directive.to_string(),
                message: message.to_string(),
            });
        }
        Ok(line.to_string())
    }
}

impl Engine for TextSocketEngine {
    fn command(&mut self, directive: &str) -> Result<(), EngineError> {
        self.round_trip(directive).map(|_| ())
    }

    fn query(&mut self, directive: &str) -> Result<String, EngineError> {
        self.round_trip(directive)
    }

    fn load_names(&mut self) -> Result<Vec<String>, EngineError> {
        let response = self.round_trip("? circuit.loads.allnames")?;
        Ok(parse_name_list(&response))
    }

    fn monitor_channel(
        &mut self,
        monitor_name: &str,
        channel: usize,
    ) -> Result<Vec<f64>, EngineError> {
        let directive = format!("? monitor.{monitor_name}.channel.{channel}");
        let response = self.round_trip(&directive)?;
        parse_float_list(&directive, &response)
    }
}

/// Splits the engine's bracketed array form into element strings.
fn parse_name_list(text: &str) -> Vec<String> {
    bracket_items(text).map(str::to_string).collect()
}

/// Parses the engine's bracketed array form as floats.
fn parse_float_list(directive: &str, text: &str) -> Result<Vec<f64>, EngineError> {
    bracket_items(text)
        .map(|item| {
            item.parse::<f64>().map_err(|e| EngineError {
                directive: directive.to_string(),
                message: format!("bad value \"{item}\" in response: {e}"),
            })
        })
        .collect()
}

fn bracket_items(text: &str) -> impl Iterator<Item = &str> {
    text.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
