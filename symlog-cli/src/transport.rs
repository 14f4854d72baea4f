//! Serial transport for the log console.

use std::fmt;
use std::time::Duration;

use serialport::{SerialPort, SerialPortType};

/// USB product descriptions that identify the debug probe's CDC interface.
const PROBE_DESCRIPTIONS: &[&str] = &["JLink CDC Uart Port", "JLink CDC UART", "J-Link"];

/// Read timeout for the underlying port. Short enough that the polling
/// loop keeps checking the interrupt flag.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Error type for transport operations
#[derive(Debug)]
pub enum TransportError {
    /// The port could not be opened
    Open(String, serialport::Error),
    /// A read failed mid-session
    Read(std::io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Open(port, err) => {
                write!(f, "failed to open serial port {port}: {err}")
            }
            TransportError::Read(err) => write!(f, "serial read failed: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Open(_, err) => Some(err),
            TransportError::Read(err) => Some(err),
        }
    }
}

/// Byte source for the session loop.
///
/// `read_chunk` is polling-friendly: `Ok(0)` means nothing has arrived
/// yet (not end of stream), and the caller yields briefly before trying
/// again. Errors are session-ending.
pub trait LogTransport {
    /// Read whatever bytes are available into `buf`, returning the count.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// Serial-port transport, 8N1 with a short read timeout.
pub struct SerialLogTransport {
    port: Box<dyn SerialPort>,
}

impl SerialLogTransport {
    /// Open `port_name` at `baud`.
    pub fn open(port_name: &str, baud: u32) -> Result<Self, TransportError> {
        let port = serialport::new(port_name, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Open(port_name.to_string(), e))?;
        Ok(SerialLogTransport { port })
    }
}

impl LogTransport for SerialLogTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.port.read(buf) {
            Ok(read) => Ok(read),
            // The timeout expiring just means no bytes arrived this poll.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(TransportError::Read(e)),
        }
    }
}

/// Find the debug probe's CDC port by USB product description.
pub fn find_probe_port() -> Option<String> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(err) => {
            log::warn!("failed to enumerate serial ports: {err}");
            return None;
        }
    };

    for port in ports {
        let description = match &port.port_type {
            SerialPortType::UsbPort(usb) => usb.product.clone().unwrap_or_default(),
            _ => String::new(),
        };
        let description = description.to_lowercase();
        if PROBE_DESCRIPTIONS
            .iter()
            .any(|wanted| description.contains(&wanted.to_lowercase()))
        {
            return Some(port.port_name);
        }
    }
    None
}

/// Print every detected serial port with its description.
pub fn print_available_ports() {
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => println!("No serial ports found."),
        Ok(ports) => {
            println!("\nAvailable serial ports:");
            for port in ports {
                println!("  {}: {}", port.port_name, describe_port_type(&port.port_type));
            }
        }
        Err(err) => println!("Failed to list serial ports: {err}"),
    }
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .unwrap_or_else(|| "USB serial device".to_string()),
        SerialPortType::BluetoothPort => "Bluetooth serial port".to_string(),
        SerialPortType::PciPort => "PCI serial port".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}
