use std::io;

use log::debug;
use serde::Deserialize;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use whereami_logic::{Location, LocationService, PositionError, PositionOptions};

pub const DEFAULT_ADDR: &str = "127.0.0.1:2947";

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Reports we care about from the gpsd JSON protocol
#[derive(Debug, Deserialize)]
#[serde(tag = "class")]
enum Report {
    #[serde(rename = "TPV")]
    Tpv(Tpv),
    #[serde(rename = "DEVICES")]
    Devices {
        #[serde(default)]
        devices: Vec<serde_json::Value>,
    },
    #[serde(other)]
    Other,
}

/// Time-position-velocity report
#[derive(Debug, Deserialize)]
struct Tpv {
    /// 0/1 = no fix, 2 = 2D, 3 = 3D
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Horizontal error estimate in meters, older daemons only send epx/epy
    eph: Option<f64>,
    epx: Option<f64>,
    epy: Option<f64>,
}

impl Tpv {
    fn into_location(self) -> Option<Location> {
        if self.mode < 2 {
            return None;
        }
        let accuracy = self
            .eph
            .or_else(|| match (self.epx, self.epy) {
                (Some(x), Some(y)) => Some(x.max(y)),
                (x, y) => x.or(y),
            })
            .unwrap_or(0.0);
        Some(Location::new(self.lat?, self.lon?, accuracy))
    }
}

/// Gets a fix from a gpsd daemon. Only reports sent after we start watching are used, so a
/// fix is never one gpsd had lying around.
pub struct GpsdLocation {
    addr: String,
}

impl GpsdLocation {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn connect_error(&self, err: io::Error) -> PositionError {
        match err.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrNotAvailable => {
                PositionError::CapabilityUnavailable(format!(
                    "No gpsd daemon is listening at {}.",
                    self.addr
                ))
            }
            io::ErrorKind::PermissionDenied => PositionError::permission_denied(),
            _ => PositionError::Unknown(format!("Failed to connect to gpsd: {err}")),
        }
    }
}

fn read_error(err: io::Error) -> PositionError {
    PositionError::Unknown(format!("Lost connection to gpsd: {err}"))
}

impl LocationService for GpsdLocation {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Location, PositionError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|err| self.connect_error(err))?;
        let (read, mut write) = stream.into_split();

        write.write_all(WATCH_COMMAND).await.map_err(read_error)?;

        let mut lines = BufReader::new(read).lines();
        while let Some(line) = lines.next_line().await.map_err(read_error)? {
            match serde_json::from_str::<Report>(&line) {
                Ok(Report::Tpv(tpv)) => {
                    if let Some(location) = tpv.into_location() {
                        return Ok(location);
                    }
                    debug!("gpsd has no fix yet");
                }
                Ok(Report::Devices { devices }) if devices.is_empty() => {
                    return Err(PositionError::CapabilityUnavailable(
                        "gpsd has no GPS receiver attached.".to_string(),
                    ));
                }
                Ok(_) => {}
                Err(why) => debug!("Skipping gpsd report: {why}"),
            }
        }

        Err(PositionError::PositionUnavailable(
            "gpsd closed the connection before reporting a fix.".to_string(),
        ))
    }
}
